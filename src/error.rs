//! Error types for bounds extraction and map assembly.

/// Failure to obtain the WGS84 footprint of one raster file.
///
/// These are recovered per file: the batch logs them and moves on.
#[derive(Debug)]
pub enum ExtractionError {
    /// The file could not be opened or read
    Io(std::io::Error),
    /// The file is not a readable TIFF
    Tiff(String),
    /// Neither ModelPixelScale+ModelTiepoint nor ModelTransformation is present
    MissingGeoreference,
    /// No GeoKey directory, or no CRS key inside it
    MissingCrs,
    /// A CRS code that cannot be resolved (user-defined or unknown to the EPSG database)
    UnsupportedCrs(i32),
    /// Reprojection to WGS84 failed
    Projection(String),
}

impl ExtractionError {
    /// True for failures caused by the coordinate reference rather than the file itself.
    #[must_use]
    pub fn is_crs_error(&self) -> bool {
        matches!(
            self,
            Self::MissingCrs | Self::UnsupportedCrs(_) | Self::Projection(_)
        )
    }
}

impl std::fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Tiff(e) => write!(f, "not a valid raster: {e}"),
            Self::MissingGeoreference => write!(f, "raster has no georeferencing tags"),
            Self::MissingCrs => write!(f, "raster has no coordinate reference system"),
            Self::UnsupportedCrs(code) => write!(f, "unsupported coordinate reference system EPSG:{code}"),
            Self::Projection(e) => write!(f, "reprojection failed: {e}"),
        }
    }
}

impl std::error::Error for ExtractionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ExtractionError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<tiff::TiffError> for ExtractionError {
    fn from(e: tiff::TiffError) -> Self {
        match e {
            tiff::TiffError::IoError(io) => Self::Io(io),
            other => Self::Tiff(other.to_string()),
        }
    }
}

/// Failure to build or save the zone map.
#[derive(Debug)]
pub enum MapError {
    /// The root directory could not be scanned
    Discovery(String),
    /// No raster file was discovered below the root
    NoRastersFound,
    /// No raster produced a footprint, so there is nothing to draw
    EmptyInput,
    /// Writing the output document failed
    Io(std::io::Error),
    /// Encoding the overlay data failed
    Serialize(serde_json::Error),
}

impl MapError {
    /// True for the two empty-result conditions, which are reported rather than treated as crashes.
    #[must_use]
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Self::NoRastersFound | Self::EmptyInput)
    }
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Discovery(e) => write!(f, "discovery failed: {e}"),
            Self::NoRastersFound => write!(f, "no raster files found"),
            Self::EmptyInput => write!(f, "could not get bounds for any file"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Serialize(e) => write!(f, "serialization error: {e}"),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Serialize(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MapError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for MapError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialize(e)
    }
}
