//! Error types for bathymetry requests.

use thiserror::Error;

/// Errors that can occur while requesting or sampling bathymetric data.
#[derive(Debug, Error)]
pub enum BathyError {
    /// I/O error reading or writing a cache file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport failure (connection, timeout, body read).
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("download from {url} failed with HTTP {status}")]
    DownloadFailed {
        /// Request URL.
        url: String,
        /// HTTP status code returned by the service.
        status: u16,
    },

    /// TIFF decoding error.
    #[error("TIFF decode error: {0}")]
    TiffDecode(#[from] tiff::TiffError),

    /// The raster could not be georeferenced.
    #[error("invalid GeoTIFF: {0}")]
    InvalidGeoTiff(String),

    /// Unrecognized data source identifier.
    #[error("unknown data source {0:?}")]
    InvalidSource(String),

    /// Recognized data source with no implementation yet.
    #[error("data source {0:?} is not implemented")]
    SourceNotImplemented(String),

    /// Unrecognized interpolation method name.
    #[error("unknown interpolation method {0:?}")]
    InvalidInterpMethod(String),

    /// A query was issued with no coordinates.
    #[error("query contains no coordinates")]
    EmptyCoordinates,

    /// No valid data at the queried coordinate.
    #[error("no elevation data at coordinate ({lon}, {lat})")]
    NoData {
        /// Requested longitude.
        lon: f64,
        /// Requested latitude.
        lat: f64,
    },

    /// Query coordinate is outside the sampled grid.
    #[error(
        "coordinate ({lon}, {lat}) is outside grid bounds \
         (lon {left}..{right}, lat {bottom}..{top})"
    )]
    OutOfBounds {
        /// Requested longitude.
        lon: f64,
        /// Requested latitude.
        lat: f64,
        /// Grid western edge.
        left: f64,
        /// Grid southern edge.
        bottom: f64,
        /// Grid eastern edge.
        right: f64,
        /// Grid northern edge.
        top: f64,
    },

    /// Failed to build the bounded worker pool for batch queries.
    #[error("worker pool error: {0}")]
    WorkerPool(String),
}
