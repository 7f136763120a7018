//! Coordinate types and projections.

pub mod projection;

/// Axis-aligned bounding box in a coordinate reference system.
///
/// Before reprojection the box is expressed in the raster's native units;
/// after [`projection::transform_bounds`] it holds WGS84 degrees with `x`
/// as longitude and `y` as latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
}

impl BoundingBox {
    /// Create a new bounding box
    #[must_use]
    pub fn new(minx: f64, miny: f64, maxx: f64, maxy: f64) -> Self {
        Self { minx, miny, maxx, maxy }
    }

    /// Smallest box enclosing every point, or `None` for an empty iterator.
    ///
    /// Points with a non-finite coordinate are skipped.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut bbox: Option<Self> = None;
        for (x, y) in points {
            if !x.is_finite() || !y.is_finite() {
                continue;
            }
            bbox = Some(match bbox {
                None => Self::new(x, y, x, y),
                Some(b) => Self::new(b.minx.min(x), b.miny.min(y), b.maxx.max(x), b.maxy.max(y)),
            });
        }
        bbox
    }

    /// Return a copy with min/max swapped where an axis is inverted.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            minx: self.minx.min(self.maxx),
            miny: self.miny.min(self.maxy),
            maxx: self.minx.max(self.maxx),
            maxy: self.miny.max(self.maxy),
        }
    }

    /// True when `min <= max` holds on both axes.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.minx <= self.maxx && self.miny <= self.maxy
    }

    /// Smallest box enclosing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            minx: self.minx.min(other.minx),
            miny: self.miny.min(other.miny),
            maxx: self.maxx.max(other.maxx),
            maxy: self.maxy.max(other.maxy),
        }
    }

    /// Center point as `(x, y)`.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        ((self.minx + self.maxx) / 2.0, (self.miny + self.maxy) / 2.0)
    }

    /// Check whether a point lies inside the box or on its edge.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.minx && x <= self.maxx && y >= self.miny && y <= self.maxy
    }

    /// Check whether this box lies entirely inside `outer`.
    #[must_use]
    pub fn is_within(&self, outer: &Self) -> bool {
        self.minx >= outer.minx
            && self.maxx <= outer.maxx
            && self.miny >= outer.miny
            && self.maxy <= outer.maxy
    }

    /// The four corners, counter-clockwise from `(minx, miny)`.
    #[must_use]
    pub fn corners(&self) -> [(f64, f64); 4] {
        [
            (self.minx, self.miny),
            (self.maxx, self.miny),
            (self.maxx, self.maxy),
            (self.minx, self.maxy),
        ]
    }

    /// Closed exterior ring (first position repeated at the end) as GeoJSON positions.
    #[must_use]
    pub fn to_ring(&self) -> Vec<Vec<f64>> {
        let corners = self.corners();
        corners
            .iter()
            .chain(std::iter::once(&corners[0]))
            .map(|&(x, y)| vec![x, y])
            .collect()
    }

    /// Check whether the interiors of two boxes overlap.
    ///
    /// Boxes that only share an edge do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.minx < other.maxx
            && other.minx < self.maxx
            && self.miny < other.maxy
            && other.miny < self.maxy
    }
}
