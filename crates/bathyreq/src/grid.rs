//! Decoded elevation grids and point interpolation.

use std::path::Path;
use std::str::FromStr;

use ndarray::{s, Array2};
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;

use crate::{BathyError, BoundingBox, Result};

/// Coordinates and grid axes are rounded to this many decimal places before
/// interpolation. A single-point bounding box is built from the query point
/// plus a fixed buffer, so without rounding the query can fall numerically
/// just outside the grid's own edge coordinate.
const INTERP_DECIMALS: i32 = 5;

/// Interpolation method for sampling a grid at a query point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpMethod {
    /// Bilinear interpolation between the four surrounding samples.
    Linear,
    /// Value of the nearest sample.
    Nearest,
}

impl FromStr for InterpMethod {
    type Err = BathyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linear" => Ok(InterpMethod::Linear),
            "nearest" => Ok(InterpMethod::Nearest),
            other => Err(BathyError::InvalidInterpMethod(other.to_string())),
        }
    }
}

/// A 2-D grid of elevation samples covering a bounding box.
///
/// Row 0 is the southernmost row and column 0 the westernmost column, so row
/// index increases with latitude and column index with longitude. The decoder
/// flips the raster's native top-down row order on load.
///
/// Rasters may carry a no-data sentinel (the `GDAL_NODATA` tag); samples
/// matching it are treated as missing rather than returned as depths.
#[derive(Debug, Clone)]
pub struct ElevationGrid {
    data: Array2<f64>,
    bounds: BoundingBox,
    nodata: Option<f64>,
}

impl ElevationGrid {
    /// Wrap an existing array and its geographic bounds.
    pub fn new(data: Array2<f64>, bounds: BoundingBox) -> Self {
        Self::with_nodata(data, bounds, None)
    }

    /// Wrap an array together with a no-data sentinel value.
    pub fn with_nodata(data: Array2<f64>, bounds: BoundingBox, nodata: Option<f64>) -> Self {
        Self {
            data,
            bounds,
            nodata,
        }
    }

    /// Load a grid from a GeoTIFF file.
    ///
    /// Georeferencing is read from the `ModelTiepoint`/`ModelPixelScale`
    /// tags. Rasters without them (e.g. WMS responses) fall back to
    /// `fallback_bounds`; if neither is available the file cannot be placed
    /// and decoding fails.
    pub fn from_geotiff<P: AsRef<Path>>(
        path: P,
        fallback_bounds: Option<BoundingBox>,
    ) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let mut decoder = Decoder::new(file)?;

        // Allow rasters well beyond the default decode limits.
        let mut limits = Limits::default();
        limits.decoding_buffer_size = 256 * 1024 * 1024;
        limits.intermediate_buffer_size = 256 * 1024 * 1024;
        limits.ifd_value_size = 256 * 1024 * 1024;
        decoder = decoder.with_limits(limits);

        let (width, height) = decoder.dimensions()?;

        let bounds = match Self::read_geotransform(&mut decoder, width, height) {
            Some(bounds) => bounds,
            None => fallback_bounds.ok_or_else(|| {
                BathyError::InvalidGeoTiff(
                    "no geotransform tags and no fallback bounds".to_string(),
                )
            })?,
        };

        let samples = Self::decode_samples(&mut decoder)?;
        if samples.len() != (width as usize) * (height as usize) {
            return Err(BathyError::InvalidGeoTiff(format!(
                "expected {}x{} samples, got {}",
                width,
                height,
                samples.len()
            )));
        }

        let top_down = Array2::from_shape_vec((height as usize, width as usize), samples)
            .map_err(|e| BathyError::InvalidGeoTiff(e.to_string()))?;
        // Flip so row 0 is the southern edge, matching an ascending latvec.
        let data = top_down.slice(s![..;-1, ..]).to_owned();

        let nodata = Self::read_nodata(&mut decoder);

        Ok(Self {
            data,
            bounds,
            nodata,
        })
    }

    /// Read the no-data sentinel from the `GDAL_NODATA` tag, if present.
    fn read_nodata<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> Option<f64> {
        decoder
            .get_tag_ascii_string(Tag::GdalNodata)
            .ok()
            .and_then(|s| s.trim_end_matches('\0').trim().parse().ok())
    }

    /// Read the geographic bounds from GeoTIFF tags, if present.
    fn read_geotransform<R: std::io::Read + std::io::Seek>(
        decoder: &mut Decoder<R>,
        width: u32,
        height: u32,
    ) -> Option<BoundingBox> {
        let tiepoint = decoder.get_tag_f64_vec(Tag::ModelTiepointTag);
        let pixel_scale = decoder.get_tag_f64_vec(Tag::ModelPixelScaleTag);

        if let (Ok(tiepoint), Ok(scale)) = (tiepoint, pixel_scale) {
            if tiepoint.len() >= 6 && scale.len() >= 2 {
                // Tiepoint is [i, j, k, x, y, z]: pixel (i, j) sits at
                // geographic (x, y), which for our rasters is the top-left
                // corner. Data extends east and south from there.
                let tie_x = tiepoint[3];
                let tie_y = tiepoint[4];
                let scale_x = scale[0];
                let scale_y = scale[1];

                return Some(BoundingBox {
                    left: tie_x,
                    bottom: tie_y - height as f64 * scale_y,
                    right: tie_x + width as f64 * scale_x,
                    top: tie_y,
                });
            }
        }

        None
    }

    /// Decode the first image plane, widening every sample type to `f64`.
    fn decode_samples<R: std::io::Read + std::io::Seek>(
        decoder: &mut Decoder<R>,
    ) -> Result<Vec<f64>> {
        let result = decoder.read_image()?;

        let samples = match result {
            DecodingResult::F64(data) => data,
            DecodingResult::F32(data) => data.into_iter().map(f64::from).collect(),
            DecodingResult::I8(data) => data.into_iter().map(f64::from).collect(),
            DecodingResult::I16(data) => data.into_iter().map(f64::from).collect(),
            DecodingResult::I32(data) => data.into_iter().map(f64::from).collect(),
            DecodingResult::I64(data) => data.into_iter().map(|v| v as f64).collect(),
            DecodingResult::U8(data) => data.into_iter().map(f64::from).collect(),
            DecodingResult::U16(data) => data.into_iter().map(f64::from).collect(),
            DecodingResult::U32(data) => data.into_iter().map(f64::from).collect(),
            DecodingResult::U64(data) => data.into_iter().map(|v| v as f64).collect(),
        };
        Ok(samples)
    }

    /// Geographic bounds of the grid.
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Grid dimensions as `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// The underlying sample array (row 0 = south, column 0 = west).
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// No-data sentinel value, if the source raster declared one.
    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    fn is_nodata(&self, value: f64) -> bool {
        match self.nodata {
            Some(nodata) => (value - nodata).abs() < 1e-3,
            None => false,
        }
    }

    /// Longitude and latitude coordinate vectors for the grid.
    ///
    /// `lonvec` has one entry per column and `latvec` one per row, evenly
    /// spaced between the bounding box edges inclusive.
    pub fn lonlat_vectors(&self) -> (Vec<f64>, Vec<f64>) {
        let (rows, cols) = self.shape();
        (
            linspace(self.bounds.left, self.bounds.right, cols),
            linspace(self.bounds.bottom, self.bounds.top, rows),
        )
    }

    /// Sample the grid at a geographic coordinate.
    ///
    /// The query and the grid edges are rounded to five decimal places
    /// before the bounds check so a point query cannot miss its own patch by
    /// float round-trip error. A coordinate outside the (rounded) bounds is
    /// an error, never an extrapolated value. A query whose contributing
    /// samples include the no-data sentinel is also an error, never a depth.
    pub fn interpolate(&self, lon: f64, lat: f64, method: InterpMethod) -> Result<f64> {
        let (rows, cols) = self.shape();

        let lon_q = round_to(lon, INTERP_DECIMALS);
        let lat_q = round_to(lat, INTERP_DECIMALS);
        let left = round_to(self.bounds.left, INTERP_DECIMALS);
        let right = round_to(self.bounds.right, INTERP_DECIMALS);
        let bottom = round_to(self.bounds.bottom, INTERP_DECIMALS);
        let top = round_to(self.bounds.top, INTERP_DECIMALS);

        if lon_q < left || lon_q > right || lat_q < bottom || lat_q > top {
            return Err(BathyError::OutOfBounds {
                lon,
                lat,
                left: self.bounds.left,
                bottom: self.bounds.bottom,
                right: self.bounds.right,
                top: self.bounds.top,
            });
        }

        // Fractional pixel position along each axis.
        let x = fractional_index(lon_q, left, right, cols);
        let y = fractional_index(lat_q, bottom, top, rows);

        match method {
            InterpMethod::Nearest => {
                let col = (x.round() as usize).min(cols - 1);
                let row = (y.round() as usize).min(rows - 1);
                let value = self.data[[row, col]];
                if self.is_nodata(value) {
                    return Err(BathyError::NoData { lon, lat });
                }
                Ok(value)
            }
            InterpMethod::Linear => {
                let x0 = x.floor() as usize;
                let y0 = y.floor() as usize;
                let x1 = (x0 + 1).min(cols - 1);
                let y1 = (y0 + 1).min(rows - 1);
                let fx = x - x0 as f64;
                let fy = y - y0 as f64;

                let v00 = self.data[[y0, x0]];
                let v10 = self.data[[y0, x1]];
                let v01 = self.data[[y1, x0]];
                let v11 = self.data[[y1, x1]];

                if [v00, v10, v01, v11].iter().any(|&v| self.is_nodata(v)) {
                    return Err(BathyError::NoData { lon, lat });
                }

                Ok(v00 * (1.0 - fx) * (1.0 - fy)
                    + v10 * fx * (1.0 - fy)
                    + v01 * (1.0 - fx) * fy
                    + v11 * fx * fy)
            }
        }
    }
}

/// `count` evenly spaced values from `start` to `stop` inclusive.
pub(crate) fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        n => {
            let step = (stop - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            // Endpoints are inclusive and exact.
            values[n - 1] = stop;
            values
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Position of `value` in pixel units along an axis of `count` samples
/// spanning `start..=stop`.
fn fractional_index(value: f64, start: f64, stop: f64, count: usize) -> f64 {
    if count <= 1 || stop == start {
        return 0.0;
    }
    (value - start) / (stop - start) * (count - 1) as f64
}
