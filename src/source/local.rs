//! Local filesystem raster source.
//!
//! Walks a directory tree for files with a raster extension.

use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use super::RasterFile;

/// Options for scanning local directories.
#[derive(Debug, Clone)]
pub struct LocalScanOptions {
    /// Minimum directory depth to scan (0 = include root files)
    pub min_depth: usize,
    /// Maximum directory depth to scan (None = unlimited)
    pub max_depth: Option<usize>,
    /// File extensions to consider as rasters (case-insensitive)
    pub extensions: Vec<String>,
    /// Whether to follow symbolic links
    pub follow_links: bool,
}

impl Default for LocalScanOptions {
    fn default() -> Self {
        Self {
            min_depth: 0,
            max_depth: None,
            extensions: vec!["tif".to_string()],
            follow_links: false,
        }
    }
}

impl LocalScanOptions {
    /// Also accept `.tiff`, `.geotiff` and `.geotif` files
    #[must_use]
    pub fn all_tiff_extensions() -> Self {
        Self {
            extensions: vec![
                "tif".to_string(),
                "tiff".to_string(),
                "geotiff".to_string(),
                "geotif".to_string(),
            ],
            ..Default::default()
        }
    }

    /// Set minimum depth
    #[must_use]
    pub fn with_min_depth(mut self, depth: usize) -> Self {
        self.min_depth = depth;
        self
    }

    /// Set maximum depth
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Replace the accepted extensions
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .is_some_and(|e| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
    }
}

/// Raster files found below a local directory.
///
/// Files are returned sorted by path within each directory so that draw
/// order is stable between runs.
#[derive(Debug, Clone, Default)]
pub struct LocalRasterSource {
    files: Vec<RasterFile>,
}

impl LocalRasterSource {
    /// Scan a directory for raster files.
    ///
    /// Unreadable subdirectories are skipped.
    ///
    /// # Errors
    /// Returns an error if the root directory does not exist.
    pub fn scan<P: AsRef<Path>>(
        root: P,
        options: &LocalScanOptions,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let root = root.as_ref();
        if !root.exists() {
            return Err(format!("Directory does not exist: {}", root.display()).into());
        }

        let mut walker = WalkDir::new(root)
            .min_depth(options.min_depth)
            .follow_links(options.follow_links)
            .sort_by_file_name();

        if let Some(max) = options.max_depth {
            walker = walker.max_depth(max);
        }

        let files: Vec<RasterFile> = walker
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_file() && options.accepts(entry.path()))
            .map(|entry| {
                debug!(path = %entry.path().display(), "Discovered raster");
                RasterFile::from_path(entry.path())
            })
            .collect();

        Ok(Self { files })
    }

    /// Get all discovered files.
    #[must_use]
    pub fn files(&self) -> &[RasterFile] {
        &self.files
    }

    /// Hand the discovered files over to the next step.
    #[must_use]
    pub fn into_files(self) -> Vec<RasterFile> {
        self.files
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
