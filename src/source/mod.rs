//! Raster file discovery.
//!
//! Discovery only finds candidate files by extension; it never opens them.
//! The resulting list is handed by value to the extraction step.
//!
//! # Example
//!
//! ```rust,no_run
//! use tifzones::source::{LocalRasterSource, LocalScanOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let source = LocalRasterSource::scan(".", &LocalScanOptions::default())?;
//!     println!("Found {} TIF files", source.len());
//!     for file in source.files() {
//!         println!("{} at {}", file.name, file.path.display());
//!     }
//!     Ok(())
//! }
//! ```

pub mod local;

pub use local::{LocalRasterSource, LocalScanOptions};

use std::path::{Path, PathBuf};

/// A discovered raster file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterFile {
    /// File name including extension, used as the map label
    pub name: String,
    /// Full path of the file
    pub path: PathBuf,
}

impl RasterFile {
    /// Build from a path, labelling it with its file name.
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());
        Self {
            name,
            path: path.to_path_buf(),
        }
    }
}
