//! EPSG lookups and coordinate transforms in pure Rust (proj4rs + crs-definitions).

use proj4rs::proj::Proj;
use proj4rs::transform::transform;

use super::BoundingBox;

/// EPSG code of WGS84 longitude/latitude, the reference all footprints are normalized to.
pub const WGS84: i32 = 4326;

/// Number of points inserted between the corners of every edge by [`transform_bounds`].
pub const DEFAULT_DENSIFY_POINTS: usize = 21;

/// Degrees off the pole at which pole containment is tested (about 0.1 mm).
const POLE_OFFSET: f64 = 1e-9;

/// Get PROJ4 string for an EPSG code using the crs-definitions database
#[inline]
pub fn get_proj_string(epsg: i32) -> Option<&'static str> {
    u16::try_from(epsg).ok()
        .and_then(crs_definitions::from_code)
        .map(|def| def.proj4)
}

/// Check if an EPSG code represents a geographic (lon/lat) CRS
#[inline]
#[must_use]
pub fn is_geographic_crs(epsg: i32) -> bool {
    // Geographic CRS codes are typically in the 4000-4999 range
    // but we check the proj string to be sure
    if let Some(proj_str) = get_proj_string(epsg) {
        proj_str.contains("+proj=longlat")
    } else {
        epsg == WGS84 || (4000..5000).contains(&epsg)
    }
}

/// Coordinate transformer between two EPSG codes.
///
/// Built once per source CRS so that densified bounds do not re-parse the
/// PROJ strings for every sampled point.
pub struct CoordTransformer {
    source_epsg: i32,
    target_epsg: i32,
    source_proj: Proj,
    target_proj: Proj,
    /// True if source uses degrees (needs radian conversion)
    source_is_geographic: bool,
    /// True if target uses degrees (needs radian conversion)
    target_is_geographic: bool,
}

impl CoordTransformer {
    /// Create a transformer from `source_epsg` to `target_epsg`.
    ///
    /// # Errors
    /// Returns an error if either code is missing from the crs-definitions database
    /// or its PROJ string cannot be parsed.
    pub fn new(source_epsg: i32, target_epsg: i32) -> Result<Self, String> {
        let source_str = get_proj_string(source_epsg)
            .ok_or_else(|| format!("EPSG:{source_epsg} is not in the crs-definitions database"))?;
        let target_str = get_proj_string(target_epsg)
            .ok_or_else(|| format!("EPSG:{target_epsg} is not in the crs-definitions database"))?;

        let source_proj = Proj::from_proj_string(source_str)
            .map_err(|e| format!("Invalid source projection EPSG:{source_epsg}: {e:?}"))?;
        let target_proj = Proj::from_proj_string(target_str)
            .map_err(|e| format!("Invalid target projection EPSG:{target_epsg}: {e:?}"))?;

        Ok(Self {
            source_epsg,
            target_epsg,
            source_proj,
            target_proj,
            source_is_geographic: is_geographic_crs(source_epsg),
            target_is_geographic: is_geographic_crs(target_epsg),
        })
    }

    /// Transform coordinates from source CRS to target CRS
    ///
    /// # Errors
    /// Returns an error if proj4rs rejects the point (e.g. outside the projection domain).
    pub fn transform(&self, x: f64, y: f64) -> Result<(f64, f64), String> {
        // proj4rs uses radians for geographic coordinates
        let mut point = if self.source_is_geographic {
            (x.to_radians(), y.to_radians(), 0.0)
        } else {
            (x, y, 0.0)
        };

        transform(&self.source_proj, &self.target_proj, &mut point).map_err(|e| {
            format!(
                "Transform from EPSG:{} to EPSG:{} failed: {e:?}",
                self.source_epsg, self.target_epsg
            )
        })?;

        if self.target_is_geographic {
            Ok((point.0.to_degrees(), point.1.to_degrees()))
        } else {
            Ok((point.0, point.1))
        }
    }
}

/// Project a point from one CRS to another.
///
/// # Errors
/// Returns an error if the EPSG code is not supported or the projection transformation fails.
#[inline]
pub fn project_point(source_epsg: i32, target_epsg: i32, x: f64, y: f64) -> Result<(f64, f64), String> {
    // No-op if same CRS
    if source_epsg == target_epsg {
        return Ok((x, y));
    }

    CoordTransformer::new(source_epsg, target_epsg)?.transform(x, y)
}

/// Reproject a bounding box, sampling `densify_points` extra points along each edge.
///
/// A CRS transform can flip, rotate or bend the box, so which input corner ends
/// up as the output minimum is unknown. The result is therefore re-derived from
/// the min/max of every transformed sample, never from the two diagonal corners.
/// Samples that fail to transform are skipped.
///
/// # Errors
/// Returns an error if the transformer cannot be built or no sample transforms.
pub fn transform_bounds(
    source_epsg: i32,
    target_epsg: i32,
    bounds: &BoundingBox,
    densify_points: usize,
) -> Result<BoundingBox, String> {
    if source_epsg == target_epsg {
        return Ok(bounds.normalized());
    }

    let transformer = CoordTransformer::new(source_epsg, target_epsg)?;
    let mut last_error = None;
    let projected: Vec<(f64, f64)> = edge_samples(bounds, densify_points)
        .into_iter()
        .filter_map(|(x, y)| match transformer.transform(x, y) {
            Ok(p) => Some(p),
            Err(e) => {
                last_error = Some(e);
                None
            }
        })
        .collect();

    let projected = BoundingBox::from_points(projected).ok_or_else(|| {
        last_error.unwrap_or_else(|| {
            format!("No finite coordinates when projecting bounds from EPSG:{source_epsg} to EPSG:{target_epsg}")
        })
    })?;

    if is_geographic_crs(target_epsg) {
        Ok(extend_to_poles(source_epsg, target_epsg, bounds, projected))
    } else {
        Ok(projected)
    }
}

/// Stretch a geographic result to a pole when that pole lies inside the source box.
///
/// Edge samples alone never reach a pole enclosed by the box (a polar
/// stereographic tile around the pole maps its edges to a ring of latitudes).
/// Such a box covers every longitude.
fn extend_to_poles(
    source_epsg: i32,
    target_epsg: i32,
    bounds: &BoundingBox,
    mut projected: BoundingBox,
) -> BoundingBox {
    let Ok(inverse) = CoordTransformer::new(target_epsg, source_epsg) else {
        return projected;
    };
    let source_box = bounds.normalized();
    for pole_lat in [90.0, -90.0] {
        // A hair off the pole, where some projections reject exact +-90
        let near_pole_lat = pole_lat - POLE_OFFSET.copysign(pole_lat);
        let Ok((x, y)) = inverse.transform(0.0, near_pole_lat) else {
            continue;
        };
        if !x.is_finite() || !y.is_finite() || !source_box.contains(x, y) {
            continue;
        }
        if pole_lat > 0.0 {
            projected.maxy = 90.0;
        } else {
            projected.miny = -90.0;
        }
        projected.minx = -180.0;
        projected.maxx = 180.0;
    }
    projected
}

/// Points along the four edges of a box: the corners plus `densify_points` per edge.
fn edge_samples(bounds: &BoundingBox, densify_points: usize) -> Vec<(f64, f64)> {
    let steps = densify_points + 1;
    let corners = bounds.corners();
    let mut samples = Vec::with_capacity(4 * steps);
    for i in 0..4 {
        let (x0, y0) = corners[i];
        let (x1, y1) = corners[(i + 1) % 4];
        // Each edge contributes its start corner and interior points; its end is the next edge's start
        for step in 0..steps {
            #[allow(clippy::cast_precision_loss)]
            let t = step as f64 / steps as f64;
            samples.push((x0 + (x1 - x0) * t, y0 + (y1 - y0) * t));
        }
    }
    samples
}
