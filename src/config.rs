//! Map defaults.
//!
//! There is no runtime configuration source: the binary always uses
//! [`MapConfig::default`]. Library callers can override individual values.

use std::path::PathBuf;

/// File the map is written to when no other path is given
pub const DEFAULT_OUTPUT_HTML: &str = "tif_zones_map.html";

/// Initial zoom of the map; the viewer can change it freely
pub const DEFAULT_ZOOM: u8 = 10;

pub const ESRI_IMAGERY_URL: &str =
    "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}";
pub const OSM_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

/// A basemap tile source, resolved by the browser when the map is viewed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayer {
    /// Name shown in the layer control
    pub name: String,
    /// URL template with `{z}`, `{x}` and `{y}` placeholders
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl TileLayer {
    /// Esri World Imagery satellite tiles
    #[must_use]
    pub fn esri_satellite() -> Self {
        Self {
            name: "Esri Satellite".to_string(),
            url_template: ESRI_IMAGERY_URL.to_string(),
            attribution: "Esri".to_string(),
            max_zoom: 19,
        }
    }

    /// Standard OpenStreetMap tiles
    #[must_use]
    pub fn openstreetmap() -> Self {
        Self {
            name: "OpenStreetMap".to_string(),
            url_template: OSM_URL.to_string(),
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
                .to_string(),
            max_zoom: 19,
        }
    }
}

/// Fixed styling of zone polygons and their labels.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneStyle {
    /// Polygon outline color
    pub stroke_color: String,
    pub stroke_weight: f64,
    pub fill_opacity: f64,
    /// Label box size in pixels
    pub label_size: (u32, u32),
    /// Pixel of the label box placed on the zone center
    pub label_anchor: (u32, u32),
    pub label_font_size: String,
}

impl Default for ZoneStyle {
    fn default() -> Self {
        Self {
            stroke_color: "black".to_string(),
            stroke_weight: 2.0,
            fill_opacity: 0.3,
            label_size: (100, 36),
            label_anchor: (50, 18),
            label_font_size: "10pt".to_string(),
        }
    }
}

/// Settings of one map build.
#[derive(Debug, Clone)]
pub struct MapConfig {
    pub zoom_start: u8,
    pub output_path: PathBuf,
    pub satellite: TileLayer,
    pub street: TileLayer,
    /// Name of the zone overlay entry in the layer control
    pub overlay_name: String,
    pub style: ZoneStyle,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            zoom_start: DEFAULT_ZOOM,
            output_path: PathBuf::from(DEFAULT_OUTPUT_HTML),
            satellite: TileLayer::esri_satellite(),
            street: TileLayer::openstreetmap(),
            overlay_name: "Zones".to_string(),
            style: ZoneStyle::default(),
        }
    }
}

impl MapConfig {
    /// Set the initial zoom
    #[must_use]
    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom_start = zoom;
        self
    }

    /// Set the output document path
    #[must_use]
    pub fn with_output_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_path = path.into();
        self
    }

    /// Set the zone style
    #[must_use]
    pub fn with_style(mut self, style: ZoneStyle) -> Self {
        self.style = style;
        self
    }
}
