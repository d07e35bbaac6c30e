//! The `BathyRequest` orchestrator.
//!
//! Ties the pieces together: query coordinates become a bounding box, the
//! bounding box becomes a source URL, the URL becomes a cached raster file,
//! the file becomes an elevation grid, and the grid is sampled at the query
//! points.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::grid::linspace;
use crate::sources::{self, DataSource, SourceParams};
use crate::{cache, geodesy, BathyError, BoundingBox, ElevationGrid, InterpMethod, Result};

/// Upper bound on concurrent downloads in batch point queries. Each worker
/// is dominated by network latency, so the pool is sized well past the CPU
/// count.
pub const MAX_WORKERS: usize = 32;

/// Upper bound on points per transect; the upstream services may reject
/// larger batched requests. Requests beyond this are clamped with a warning.
pub const MAX_TRANSECT_POINTS: usize = 800;

/// HTTP timeout for a single raster download.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// A depth profile along a path between two geographic points.
#[derive(Debug, Clone)]
pub struct Transect {
    /// Sample coordinates as `(lon, lat)`, index-aligned with the other
    /// fields.
    pub points: Vec<(f64, f64)>,
    /// Depth/elevation at each sample point.
    pub depths: Vec<f64>,
    /// Cumulative great-circle distance in kilometers from the first point.
    pub distances_km: Vec<f64>,
}

/// Requests bathymetric data from a configured source.
///
/// Downloads land in `cache_dir` under unique timestamped filenames; when
/// `clear_cache` is set each file is deleted again right after decoding.
/// Instances are cheap to share across threads.
#[derive(Debug)]
pub struct BathyRequest {
    source: DataSource,
    cache_dir: PathBuf,
    clear_cache: bool,
    client: reqwest::blocking::Client,
}

impl BathyRequest {
    /// Create a new request orchestrator.
    ///
    /// The cache directory is created lazily on the first query, not here.
    pub fn new<P: AsRef<Path>>(
        source: DataSource,
        cache_dir: P,
        clear_cache: bool,
    ) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()?;
        Ok(Self {
            source,
            cache_dir: cache_dir.as_ref().to_path_buf(),
            clear_cache,
            client,
        })
    }

    /// The configured data source.
    pub fn source(&self) -> DataSource {
        self.source
    }

    /// The configured cache directory.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Form the bounding box for a query.
    ///
    /// For an area query the box is the min/max of the coordinate
    /// sequences; for a single point it is the first coordinate pair
    /// expanded by a small fixed buffer. Empty coordinate slices are an
    /// error: there is nothing to bound.
    pub fn form_bbox(
        longitude: &[f64],
        latitude: &[f64],
        single_point: bool,
    ) -> Result<BoundingBox> {
        if longitude.is_empty() || latitude.is_empty() {
            return Err(BathyError::EmptyCoordinates);
        }
        Ok(if single_point {
            BoundingBox::around_point(longitude[0], latitude[0])
        } else {
            BoundingBox::from_ranges(longitude, latitude)
        })
    }

    /// Fetch the grid covering the supplied coordinate ranges, with the
    /// source's default parameters.
    ///
    /// Returns the grid plus its longitude and latitude coordinate vectors.
    pub fn get_area(
        &self,
        longitude: &[f64],
        latitude: &[f64],
    ) -> Result<(ElevationGrid, Vec<f64>, Vec<f64>)> {
        let params = SourceParams::defaults_for(self.source)?;
        self.get_area_with(longitude, latitude, false, params)
    }

    /// Fetch a grid with explicit parameter overrides.
    ///
    /// When `single_point` is set, the bounding box is the buffered point
    /// and the requested raster is forced down to 2x2 pixels, the minimum
    /// needed for interpolation.
    pub fn get_area_with(
        &self,
        longitude: &[f64],
        latitude: &[f64],
        single_point: bool,
        mut params: SourceParams,
    ) -> Result<(ElevationGrid, Vec<f64>, Vec<f64>)> {
        let bbox = Self::form_bbox(longitude, latitude, single_point)?;
        fs::create_dir_all(&self.cache_dir)?;
        if single_point {
            params.set_size(2, 2);
        }

        let request = sources::build(&bbox, self.source, &params)?;
        let filename = format!("{}.{}", cache::generate_filename(), request.file_extension());
        let filepath = self.cache_dir.join(filename);

        self.download(&request.url, &filepath)?;

        // Services that return plain rasters carry no geo tags; the request
        // bbox is the authoritative extent in that case.
        let grid = ElevationGrid::from_geotiff(&filepath, Some(bbox))?;

        if self.clear_cache {
            fs::remove_file(&filepath)?;
        }

        let (lonvec, latvec) = grid.lonlat_vectors();
        Ok((grid, lonvec, latvec))
    }

    /// Fetch the depth at a single coordinate with default parameters.
    pub fn get_point(&self, lon: f64, lat: f64, method: InterpMethod) -> Result<f64> {
        let params = SourceParams::defaults_for(self.source)?;
        self.get_point_with(lon, lat, method, params)
    }

    /// Fetch the depth at a single coordinate with explicit parameter
    /// overrides.
    ///
    /// Downloads a minimal patch around the point and interpolates the grid
    /// at the exact query coordinate.
    pub fn get_point_with(
        &self,
        lon: f64,
        lat: f64,
        method: InterpMethod,
        params: SourceParams,
    ) -> Result<f64> {
        let (grid, _, _) = self.get_area_with(&[lon], &[lat], true, params)?;
        grid.interpolate(lon, lat, method)
    }

    /// Fetch depths at several independent coordinates with default
    /// parameters.
    pub fn get_points(&self, points: &[(f64, f64)], method: InterpMethod) -> Result<Vec<f64>> {
        let params = SourceParams::defaults_for(self.source)?;
        self.get_points_with(points, method, &params)
    }

    /// Fetch depths at several independent coordinates.
    ///
    /// Each point triggers its own download-decode-interpolate cycle; the
    /// cycles run on a bounded worker pool since each is dominated by
    /// network latency. Results preserve input order regardless of
    /// completion order. The first failing point aborts the whole batch;
    /// callers needing partial results must query points individually.
    pub fn get_points_with(
        &self,
        points: &[(f64, f64)],
        method: InterpMethod,
        params: &SourceParams,
    ) -> Result<Vec<f64>> {
        par_map_ordered(points, MAX_WORKERS, |&(lon, lat)| {
            self.get_point_with(lon, lat, method, params.clone())
        })
    }

    /// Fetch a depth profile along the path between two points, with
    /// default parameters.
    pub fn get_transect(
        &self,
        point1: (f64, f64),
        point2: (f64, f64),
        num_points: usize,
        method: InterpMethod,
    ) -> Result<Transect> {
        let params = SourceParams::defaults_for(self.source)?;
        self.get_transect_with(point1, point2, num_points, method, &params)
    }

    /// Fetch a depth profile along the path between two points.
    ///
    /// Sample coordinates are spaced by independent linear interpolation of
    /// longitude and latitude, an approximation of the great-circle path.
    /// Distances are cumulative great-circle kilometers from `point1`.
    pub fn get_transect_with(
        &self,
        point1: (f64, f64),
        point2: (f64, f64),
        num_points: usize,
        method: InterpMethod,
        params: &SourceParams,
    ) -> Result<Transect> {
        let points = transect_points(point1, point2, num_points);
        debug!(count = points.len(), "sampling transect");
        let depths = self.get_points_with(&points, method, params)?;
        let distances_km = geodesy::cumulative_distances_km(&points);
        Ok(Transect {
            points,
            depths,
            distances_km,
        })
    }

    /// Download `url` into `filepath`, streaming the body to disk.
    fn download(&self, url: &str, filepath: &Path) -> Result<()> {
        debug!(url, path = %filepath.display(), "downloading raster");
        let mut response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(BathyError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let mut file = fs::File::create(filepath)?;
        response.copy_to(&mut file)?;
        Ok(())
    }
}

/// Generate the sample coordinates for a transect, clamping the count to
/// [`MAX_TRANSECT_POINTS`].
fn transect_points(
    point1: (f64, f64),
    point2: (f64, f64),
    num_points: usize,
) -> Vec<(f64, f64)> {
    let count = if num_points > MAX_TRANSECT_POINTS {
        warn!(
            requested = num_points,
            max = MAX_TRANSECT_POINTS,
            "transect point count clamped"
        );
        MAX_TRANSECT_POINTS
    } else {
        num_points
    };

    let lons = linspace(point1.0, point2.0, count);
    let lats = linspace(point1.1, point2.1, count);
    lons.into_iter().zip(lats).collect()
}

/// Apply `f` to every item on a bounded worker pool, collecting results in
/// input order. The first error aborts outstanding work and is returned.
fn par_map_ordered<T, U, F>(items: &[T], max_workers: usize, f: F) -> Result<Vec<U>>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> Result<U> + Send + Sync,
{
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let workers = max_workers.min(items.len());
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| BathyError::WorkerPool(e.to_string()))?;

    pool.install(|| items.par_iter().map(f).collect())
}
