//! # bathyreq
//!
//! Fetch bathymetric (seafloor elevation) data from public geospatial web
//! services and interpolate depths at arbitrary query points.
//!
//! Supported sources:
//! - NOAA NCEI global DEM mosaic (ArcGIS ImageServer export)
//! - GEBCO global grid (WMS getmap)
//!
//! Requests are built as parameterized query-string URLs, downloaded to a
//! local cache directory, decoded from GeoTIFF into an elevation grid, and
//! sampled with linear or nearest-neighbor interpolation. Downloaded files
//! are deleted after use unless the orchestrator is configured to keep them.
//!
//! ## Examples
//!
//! ```no_run
//! use bathyreq::{BathyRequest, DataSource, InterpMethod};
//!
//! let req = BathyRequest::new(DataSource::Ncei, "./bathy_cache", true)?;
//!
//! // Fetch a grid covering an area off San Diego.
//! let (grid, lonvec, latvec) =
//!     req.get_area(&[-117.43, -117.23], &[32.55, 32.75])?;
//! println!("{} x {} samples", latvec.len(), lonvec.len());
//!
//! // Depth at a single coordinate.
//! let depth = req.get_point(-117.43, 32.55, InterpMethod::Linear)?;
//! println!("depth: {depth} m");
//! # Ok::<(), bathyreq::BathyError>(())
//! ```
//!
//! A depth profile between two points:
//!
//! ```no_run
//! use bathyreq::{BathyRequest, DataSource, InterpMethod};
//!
//! let req = BathyRequest::new(DataSource::Ncei, "./bathy_cache", true)?;
//! let transect = req.get_transect(
//!     (-117.43, 32.55),
//!     (-117.23, 32.75),
//!     100,
//!     InterpMethod::Linear,
//! )?;
//! for ((lon, lat), (depth, km)) in transect
//!     .points
//!     .iter()
//!     .zip(transect.depths.iter().zip(&transect.distances_km))
//! {
//!     println!("{km:8.2} km  ({lon:.4}, {lat:.4})  {depth:.1} m");
//! }
//! # Ok::<(), bathyreq::BathyError>(())
//! ```

mod bbox;
mod cache;
mod error;
mod geodesy;
mod grid;
mod request;
pub mod sources;

pub use bbox::{BoundingBox, POINT_BUFFER_DEG};
pub use cache::clear_cache;
pub use error::BathyError;
pub use geodesy::{cumulative_distances_km, haversine_km};
pub use grid::{ElevationGrid, InterpMethod};
pub use request::{BathyRequest, Transect, MAX_TRANSECT_POINTS, MAX_WORKERS};
pub use sources::{DataSource, SourceParams, SourceRequest};

/// Result type for bathymetry operations.
pub type Result<T> = std::result::Result<T, BathyError>;
