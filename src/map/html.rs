//! Leaflet HTML rendering of a [`MapDocument`].
//!
//! The page embeds two JSON blocks, `zone-polygons` (a GeoJSON feature
//! collection) and `zone-labels` (one marker per zone), and a short script
//! that hands them to Leaflet. Tile layers are plain URL templates fetched
//! by the browser.

use serde_json::{json, Value as JsonValue};

use super::{MapDocument, ZoneOverlay};
use crate::config::ZoneStyle;
use crate::error::MapError;

pub const POLYGONS_BLOCK_ID: &str = "zone-polygons";
pub const LABELS_BLOCK_ID: &str = "zone-labels";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0"/>
  <title>TIF zones</title>
  <link
    rel="stylesheet"
    href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css"
    integrity="sha256-p4NxAoJBhIIN+hmNHrzRCf9tD/miZyoHS5obTRR9BMY="
    crossorigin=""
  />
  <style>
    html, body { height: 100%; margin: 0; padding: 0; }
    #map { height: 100%; width: 100%; }
    .zone-label { background: none; border: none; }
  </style>
</head>
<body>
  <div id="map"></div>

  <script
    src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"
    integrity="sha256-20nQCchB9co0qIjJZRGuk2/Z9VM+kNiyxNV1lvTlZBo="
    crossorigin=""
  ></script>

  <script id="zone-polygons" type="application/json">__POLYGONS__</script>
  <script id="zone-labels" type="application/json">__LABELS__</script>

  <script>
    const settings = __SETTINGS__;
    const polygons = JSON.parse(document.getElementById('zone-polygons').textContent);
    const labels = JSON.parse(document.getElementById('zone-labels').textContent);

    const map = L.map('map').setView([settings.center.lat, settings.center.lon], settings.zoom);

    const baseLayers = {};
    settings.baseLayers.forEach((layer, index) => {
      const tiles = L.tileLayer(layer.url, {
        attribution: layer.attribution,
        maxZoom: layer.maxZoom
      });
      baseLayers[layer.name] = tiles;
      if (index === settings.activeBase) {
        tiles.addTo(map);
      }
    });

    // Zones live in their own group so switching the basemap leaves them in place
    const zones = L.featureGroup().addTo(map);

    L.geoJSON(polygons, {
      style: feature => ({
        fillColor: feature.properties.fill_color,
        color: settings.style.stroke,
        weight: settings.style.weight,
        fillOpacity: settings.style.fillOpacity
      }),
      onEachFeature: (feature, layer) => layer.bindTooltip(feature.properties.tooltip)
    }).addTo(zones);

    labels.forEach(label => {
      L.marker([label.lat, label.lon], {
        icon: L.divIcon({
          className: 'zone-label',
          iconSize: settings.style.labelSize,
          iconAnchor: settings.style.labelAnchor,
          html: label.html
        })
      }).addTo(zones);
    });

    L.control.layers(baseLayers, { [settings.overlayName]: zones }).addTo(map);
  </script>
</body>
</html>
"#;

/// Render the full page.
pub(crate) fn render(document: &MapDocument) -> Result<String, MapError> {
    let mut polygons = document.feature_collection();
    // Tooltips are rendered as HTML by Leaflet, so they get the escaped label
    for (feature, zone) in polygons.features.iter_mut().zip(&document.zones) {
        feature.set_property("tooltip", escape_html(&zone.label));
    }
    let labels: Vec<JsonValue> = document
        .zones
        .iter()
        .map(|zone| label_marker(zone, &document.style))
        .collect();

    Ok(PAGE_TEMPLATE
        .replace("__POLYGONS__", &embed_json(&polygons)?)
        .replace("__LABELS__", &embed_json(&labels)?)
        .replace("__SETTINGS__", &embed_json(&settings(document))?))
}

fn settings(document: &MapDocument) -> JsonValue {
    let style = &document.style;
    json!({
        "center": { "lat": document.view.center_lat, "lon": document.view.center_lon },
        "zoom": document.zoom_start,
        "activeBase": document.active_base,
        "overlayName": document.overlay_name,
        "baseLayers": document.base_layers.iter().map(|layer| json!({
            "name": layer.name,
            "url": layer.url_template,
            "attribution": layer.attribution,
            "maxZoom": layer.max_zoom,
        })).collect::<Vec<_>>(),
        "style": {
            "stroke": style.stroke_color,
            "weight": style.stroke_weight,
            "fillOpacity": style.fill_opacity,
            "labelSize": [style.label_size.0, style.label_size.1],
            "labelAnchor": [style.label_anchor.0, style.label_anchor.1],
        },
    })
}

fn label_marker(zone: &ZoneOverlay, style: &ZoneStyle) -> JsonValue {
    let (lat, lon) = zone.label_position();
    let html = format!(
        "<div style=\"font-size: {}; color: black; background-color: white; \
         border: 1px solid black; border-radius: 3px; padding: 3px; \
         opacity: 0.8; text-align: center;\">{}</div>",
        style.label_font_size,
        escape_html(&zone.label)
    );
    json!({ "name": zone.label, "lat": lat, "lon": lon, "html": html })
}

/// Serialize for embedding inside a `<script>` element.
///
/// `<` only occurs inside JSON strings, where `<` is equivalent, so no
/// value can close the surrounding element.
fn embed_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, MapError> {
    Ok(serde_json::to_string(value)?.replace('<', "\\u003c"))
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Contents of the JSON block with the given element id.
pub fn json_block<'a>(page: &'a str, id: &str) -> Option<&'a str> {
    let open = format!("<script id=\"{id}\" type=\"application/json\">");
    let start = page.find(&open)? + open.len();
    let len = page[start..].find("</script>")?;
    Some(&page[start..start + len])
}
