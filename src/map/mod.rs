//! Map assembly: turn footprints into an interactive zone map.
//!
//! # Example
//!
//! ```rust,no_run
//! use tifzones::{BoundingBox, MapAssembler, MapConfig, RasterBoundsRecord};
//!
//! fn main() -> Result<(), tifzones::MapError> {
//!     let records = vec![
//!         RasterBoundsRecord::new("west.tif", BoundingBox::new(30.0, 50.0, 30.5, 50.5)),
//!         RasterBoundsRecord::new("east.tif", BoundingBox::new(30.5, 50.0, 31.0, 50.5)),
//!     ];
//!     let mut assembler = MapAssembler::new(MapConfig::default());
//!     let document = assembler.assemble(&records, "zones.html")?;
//!     println!("{} zones around {:?}", document.zones.len(), document.view);
//!     Ok(())
//! }
//! ```

pub mod color;
pub mod html;

use std::fs;
use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;
use tracing::info;

use crate::config::{MapConfig, TileLayer, ZoneStyle};
use crate::error::MapError;
use crate::extract::RasterBoundsRecord;
use crate::geometry::BoundingBox;

pub use color::{Color, ColorSource, Palette, RandomColors};

/// Initial viewport center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewFrame {
    pub center_lat: f64,
    pub center_lon: f64,
}

impl ViewFrame {
    /// Center of the box enclosing every record, or `None` without records.
    ///
    /// This is the midpoint of the global extent, not the mean of the
    /// per-record centers, so small zones do not pull the view toward them.
    #[must_use]
    pub fn from_records(records: &[RasterBoundsRecord]) -> Option<Self> {
        let extent = records
            .iter()
            .map(|r| r.bounds)
            .reduce(|acc, b| acc.union(&b))?;
        let (center_lon, center_lat) = extent.center();
        Some(Self {
            center_lat,
            center_lon,
        })
    }
}

/// One zone drawn on the map: its polygon, color and label.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneOverlay {
    pub label: String,
    /// WGS84 footprint
    pub bounds: BoundingBox,
    /// Fill color assigned to this zone alone
    pub fill_color: Color,
}

impl ZoneOverlay {
    /// Label position as `(lat, lon)`: the center of the zone's own footprint
    #[must_use]
    pub fn label_position(&self) -> (f64, f64) {
        let (lon, lat) = self.bounds.center();
        (lat, lon)
    }

    /// Closed rectangular polygon feature carrying the label and fill color.
    #[must_use]
    pub fn to_feature(&self) -> Feature {
        let mut properties = JsonObject::new();
        properties.insert("name".to_string(), json!(self.label));
        properties.insert("fill_color".to_string(), json!(self.fill_color.to_hex()));
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Polygon(vec![self.bounds.to_ring()]))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

/// The assembled zone map, kept in memory after it has been saved.
#[derive(Debug, Clone)]
pub struct MapDocument {
    pub view: ViewFrame,
    pub zoom_start: u8,
    /// Zones in draw order; later zones are painted on top
    pub zones: Vec<ZoneOverlay>,
    /// Satellite first, street map second
    pub base_layers: [TileLayer; 2],
    /// Index into `base_layers` of the layer shown when the map opens
    pub active_base: usize,
    pub overlay_name: String,
    pub style: ZoneStyle,
}

impl MapDocument {
    /// All zone polygons as a GeoJSON feature collection.
    #[must_use]
    pub fn feature_collection(&self) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: self.zones.iter().map(ZoneOverlay::to_feature).collect(),
            foreign_members: None,
        }
    }

    /// Render as a self-contained Leaflet HTML page.
    ///
    /// # Errors
    /// Returns an error if the overlay data cannot be encoded.
    pub fn to_html(&self) -> Result<String, MapError> {
        html::render(self)
    }

    /// Write the HTML page to `path`.
    ///
    /// # Errors
    /// Returns an error if rendering or writing the file fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), MapError> {
        fs::write(path, self.to_html()?)?;
        Ok(())
    }
}

/// Builds [`MapDocument`]s from footprints.
pub struct MapAssembler<C = RandomColors> {
    config: MapConfig,
    colors: C,
}

impl MapAssembler<RandomColors> {
    /// Assembler with random zone colors
    #[must_use]
    pub fn new(config: MapConfig) -> Self {
        Self {
            config,
            colors: RandomColors::new(),
        }
    }
}

impl<C: ColorSource> MapAssembler<C> {
    /// Assembler with a caller-supplied color source
    #[must_use]
    pub fn with_colors(config: MapConfig, colors: C) -> Self {
        Self { config, colors }
    }

    #[must_use]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Build the document in memory without writing it.
    ///
    /// Records are drawn in input order. Each zone gets its own color,
    /// taken from the color source at the moment the zone is built.
    ///
    /// # Errors
    /// [`MapError::EmptyInput`] when `records` is empty.
    pub fn build(&mut self, records: &[RasterBoundsRecord]) -> Result<MapDocument, MapError> {
        let view = ViewFrame::from_records(records).ok_or(MapError::EmptyInput)?;

        let zones = records
            .iter()
            .map(|record| ZoneOverlay {
                label: record.label.clone(),
                bounds: record.bounds,
                fill_color: self.colors.next_color(),
            })
            .collect();

        Ok(MapDocument {
            view,
            zoom_start: self.config.zoom_start,
            zones,
            base_layers: [self.config.satellite.clone(), self.config.street.clone()],
            active_base: 1,
            overlay_name: self.config.overlay_name.clone(),
            style: self.config.style.clone(),
        })
    }

    /// Build the document and save it to `output`.
    ///
    /// # Errors
    /// [`MapError::EmptyInput`] when `records` is empty (nothing is written),
    /// or an I/O error if the file cannot be written.
    pub fn assemble<P: AsRef<Path>>(
        &mut self,
        records: &[RasterBoundsRecord],
        output: P,
    ) -> Result<MapDocument, MapError> {
        let document = self.build(records)?;
        document.save(&output)?;
        info!(path = %output.as_ref().display(), "Map saved");
        Ok(document)
    }
}
