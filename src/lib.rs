#![doc = include_str!("../README.md")]
//!
//! ## Architecture
//!
//! - [`source`]: raster discovery in a local directory tree
//! - [`raster_meta`]: GeoTIFF metadata (georeferencing tags and GeoKeys), no pixel data
//! - [`geometry`]: [`BoundingBox`] and projections ([`transform_bounds`])
//! - [`extract`]: per-file WGS84 footprints ([`extract_bounds`], [`extract_all`])
//! - [`map`]: zone map assembly ([`MapAssembler`]) and Leaflet HTML output
//! - [`pipeline`]: the whole run as used by the `tifzones` binary

// ============================================================================
// Public modules
// ============================================================================

pub mod config;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod map;
pub mod pipeline;
pub mod raster_meta;
pub mod source;

// ============================================================================
// Errors
// ============================================================================

pub use error::{ExtractionError, MapError};

// ============================================================================
// Geometry & Projections
// ============================================================================

pub use geometry::BoundingBox;
pub use geometry::projection::{
    get_proj_string,
    is_geographic_crs,
    project_point,
    transform_bounds,
    CoordTransformer,
    WGS84,
};

// ============================================================================
// Discovery & Extraction
// ============================================================================

pub use source::{LocalRasterSource, LocalScanOptions, RasterFile};
pub use raster_meta::RasterMetadata;
pub use extract::{
    extract_all,
    extract_bounds,
    ExtractionFailure,
    ExtractionReport,
    RasterBoundsRecord,
};

// ============================================================================
// Map Assembly
// ============================================================================

pub use config::{MapConfig, TileLayer, ZoneStyle};
pub use map::{
    Color,
    ColorSource,
    MapAssembler,
    MapDocument,
    Palette,
    RandomColors,
    ViewFrame,
    ZoneOverlay,
};
pub use pipeline::{build_zone_map, run, ZoneMapRun};
