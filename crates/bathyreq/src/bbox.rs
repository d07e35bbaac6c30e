//! Geographic bounding boxes for query extents.

/// Buffer added around a single query point, in degrees.
///
/// A point query still needs a small surrounding patch so the grid has
/// something to interpolate between.
pub const POINT_BUFFER_DEG: f64 = 0.001;

/// Geographic rectangle delimiting a query or raster extent.
///
/// Edge naming follows the usual raster convention: `left`/`right` are the
/// west/east longitudes, `bottom`/`top` the south/north latitudes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Western edge (minimum longitude).
    pub left: f64,
    /// Southern edge (minimum latitude).
    pub bottom: f64,
    /// Eastern edge (maximum longitude).
    pub right: f64,
    /// Northern edge (maximum latitude).
    pub top: f64,
}

impl BoundingBox {
    /// Create a bounding box from explicit edges.
    pub fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    /// Form the bounding box covering the supplied longitude and latitude
    /// sequences, taking the min/max of each.
    ///
    /// Empty input yields a degenerate box of NaN edges; callers are expected
    /// to pass at least one coordinate.
    pub fn from_ranges(longitude: &[f64], latitude: &[f64]) -> Self {
        // f64::min/max ignore the NaN seed, so the first value wins.
        let fold = |values: &[f64]| {
            values
                .iter()
                .fold((f64::NAN, f64::NAN), |(min, max), &v| (min.min(v), max.max(v)))
        };
        let (left, right) = fold(longitude);
        let (bottom, top) = fold(latitude);
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    /// Form the bounding box for a single point, expanded by
    /// [`POINT_BUFFER_DEG`] on each side.
    pub fn around_point(lon: f64, lat: f64) -> Self {
        Self {
            left: lon - POINT_BUFFER_DEG,
            bottom: lat - POINT_BUFFER_DEG,
            right: lon + POINT_BUFFER_DEG,
            top: lat + POINT_BUFFER_DEG,
        }
    }

    /// Check whether a coordinate falls inside the box (edges inclusive).
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.left && lon <= self.right && lat >= self.bottom && lat <= self.top
    }

    /// Comma-joined `left,bottom,right,top` string with five decimal places,
    /// the format both supported services expect for their `bbox` parameter.
    pub fn to_query_string(&self) -> String {
        format!(
            "{:.5},{:.5},{:.5},{:.5}",
            self.left, self.bottom, self.right, self.top
        )
    }
}
