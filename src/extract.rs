//! Bounds extraction: the WGS84 footprint of each raster file.
//!
//! # Example
//!
//! ```rust,no_run
//! use tifzones::extract::extract_bounds;
//!
//! let bounds = extract_bounds("tiles/zone_01.tif")?;
//! println!("{} {} {} {}", bounds.minx, bounds.miny, bounds.maxx, bounds.maxy);
//! # Ok::<(), tifzones::ExtractionError>(())
//! ```

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::ExtractionError;
use crate::geometry::projection::{get_proj_string, transform_bounds, DEFAULT_DENSIFY_POINTS, WGS84};
use crate::geometry::BoundingBox;
use crate::raster_meta::RasterMetadata;
use crate::source::RasterFile;

/// Footprint of one raster file in WGS84 degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterBoundsRecord {
    /// File name shown on the map; not necessarily unique
    pub label: String,
    /// `minx`/`maxx` are longitudes, `miny`/`maxy` latitudes
    pub bounds: BoundingBox,
}

impl RasterBoundsRecord {
    #[must_use]
    pub fn new(label: impl Into<String>, bounds: BoundingBox) -> Self {
        Self {
            label: label.into(),
            bounds,
        }
    }
}

/// A file that could not be turned into a footprint.
#[derive(Debug)]
pub struct ExtractionFailure {
    pub path: PathBuf,
    pub error: ExtractionError,
}

/// Outcome of extracting a batch of files.
#[derive(Debug, Default)]
pub struct ExtractionReport {
    /// Successful footprints, in the order the files were given
    pub records: Vec<RasterBoundsRecord>,
    pub failures: Vec<ExtractionFailure>,
}

impl ExtractionReport {
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}

/// Read a raster's native bounds and CRS, and reproject the bounds to WGS84.
///
/// Only metadata is read. The result always satisfies `min <= max` on both axes.
///
/// # Errors
/// Returns an [`ExtractionError`] if the file cannot be read, is not a
/// georeferenced TIFF, or its CRS is missing or cannot be transformed.
pub fn extract_bounds<P: AsRef<Path>>(path: P) -> Result<BoundingBox, ExtractionError> {
    let metadata = RasterMetadata::open(path)?;
    bounds_from_metadata(&metadata)
}

/// Reproject the native bounds described by already-read metadata.
///
/// # Errors
/// See [`extract_bounds`].
pub fn bounds_from_metadata(metadata: &RasterMetadata) -> Result<BoundingBox, ExtractionError> {
    let crs_code = metadata.crs_code()?;
    if get_proj_string(crs_code).is_none() {
        return Err(ExtractionError::UnsupportedCrs(crs_code));
    }
    let native = metadata.native_bounds()?;
    let bounds = transform_bounds(crs_code, WGS84, &native, DEFAULT_DENSIFY_POINTS)
        .map_err(ExtractionError::Projection)?;
    if !bounds.is_within(&WORLD) {
        return Err(ExtractionError::Projection(format!(
            "EPSG:{crs_code} footprint {bounds:?} is outside the WGS84 range"
        )));
    }
    Ok(bounds)
}

/// Valid WGS84 longitude/latitude range
const WORLD: BoundingBox = BoundingBox {
    minx: -180.0,
    miny: -90.0,
    maxx: 180.0,
    maxy: 90.0,
};

/// Extract every file, logging each success and failure.
///
/// A failing file never stops the batch and never disturbs the order of the
/// records that succeed.
pub fn extract_all<I>(files: I) -> ExtractionReport
where
    I: IntoIterator<Item = RasterFile>,
{
    let mut report = ExtractionReport::default();
    for file in files {
        match extract_bounds(&file.path) {
            Ok(bounds) => {
                info!(file = %file.name, "Processed file");
                report.records.push(RasterBoundsRecord::new(file.name, bounds));
            }
            Err(error) => {
                warn!(
                    path = %file.path.display(),
                    error = %error,
                    crs_error = error.is_crs_error(),
                    "Failed to process file"
                );
                report.failures.push(ExtractionFailure {
                    path: file.path,
                    error,
                });
            }
        }
    }
    report
}
