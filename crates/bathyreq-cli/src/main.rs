//! Command-line bathymetry queries.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context};
use bathyreq::{clear_cache, BathyRequest, DataSource, InterpMethod};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bathyreq", version, about = "Query bathymetric depths from public data sources")]
struct Cli {
    /// Data source: ncei or gebco.
    #[arg(long, global = true, default_value = "ncei")]
    source: String,

    /// Cache directory for downloaded rasters.
    #[arg(long, global = true, default_value = "./bathy_cache")]
    cache_dir: PathBuf,

    /// Keep downloaded rasters instead of deleting them after use.
    #[arg(long, global = true)]
    keep_cache: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Depth at a single coordinate.
    Point {
        /// Longitude in decimal degrees.
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Latitude in decimal degrees.
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Interpolation method: linear or nearest.
        #[arg(long, default_value = "linear")]
        method: String,
    },
    /// Fetch the grid covering an area and print a summary.
    Area {
        #[arg(long, allow_hyphen_values = true)]
        lon_min: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon_max: f64,
        #[arg(long, allow_hyphen_values = true)]
        lat_min: f64,
        #[arg(long, allow_hyphen_values = true)]
        lat_max: f64,
    },
    /// Depth profile between two points.
    Transect {
        /// Start point as LON,LAT.
        #[arg(long, value_name = "LON,LAT", allow_hyphen_values = true)]
        from: String,
        /// End point as LON,LAT.
        #[arg(long, value_name = "LON,LAT", allow_hyphen_values = true)]
        to: String,
        /// Number of sample points along the path.
        #[arg(long, default_value_t = 100)]
        num_points: usize,
        /// Interpolation method: linear or nearest.
        #[arg(long, default_value = "linear")]
        method: String,
    },
    /// Delete the cache directory and everything in it.
    ClearCache,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if let Command::ClearCache = cli.command {
        clear_cache(&cli.cache_dir)?;
        println!("cleared {}", cli.cache_dir.display());
        return Ok(());
    }

    let source: DataSource = cli.source.parse()?;
    let req = BathyRequest::new(source, &cli.cache_dir, !cli.keep_cache)?;

    match cli.command {
        Command::Point { lon, lat, method } => {
            let method: InterpMethod = method.parse()?;
            let depth = req.get_point(lon, lat, method)?;
            println!("{depth:.2}");
        }
        Command::Area {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        } => {
            let (grid, lonvec, latvec) =
                req.get_area(&[lon_min, lon_max], &[lat_min, lat_max])?;
            let bounds = grid.bounds();
            let (rows, cols) = grid.shape();
            println!("grid: {rows} rows x {cols} cols");
            println!(
                "bounds: lon {:.5}..{:.5}, lat {:.5}..{:.5}",
                bounds.left, bounds.right, bounds.bottom, bounds.top
            );
            println!(
                "spacing: {:.6} deg lon, {:.6} deg lat",
                (bounds.right - bounds.left) / (lonvec.len() - 1).max(1) as f64,
                (bounds.top - bounds.bottom) / (latvec.len() - 1).max(1) as f64,
            );
            let min = grid.data().iter().cloned().fold(f64::INFINITY, f64::min);
            let max = grid.data().iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            println!("elevation range: {min:.1}..{max:.1} m");
        }
        Command::Transect {
            from,
            to,
            num_points,
            method,
        } => {
            let method: InterpMethod = method.parse()?;
            let from = parse_point(&from)?;
            let to = parse_point(&to)?;
            let transect = req.get_transect(from, to, num_points, method)?;
            println!("{:>9}  {:>10}  {:>10}  {:>10}", "km", "lon", "lat", "depth (m)");
            for (((lon, lat), depth), km) in transect
                .points
                .iter()
                .zip(&transect.depths)
                .zip(&transect.distances_km)
            {
                println!("{km:9.2}  {lon:10.4}  {lat:10.4}  {depth:10.1}");
            }
        }
        Command::ClearCache => unreachable!("handled above"),
    }

    Ok(())
}

/// Parse a `LON,LAT` pair.
fn parse_point(s: &str) -> anyhow::Result<(f64, f64)> {
    let (lon, lat) = s
        .split_once(',')
        .ok_or_else(|| anyhow!("expected LON,LAT, got {s:?}"))?;
    let lon = lon
        .trim()
        .parse()
        .with_context(|| format!("invalid longitude in {s:?}"))?;
    let lat = lat
        .trim()
        .parse()
        .with_context(|| format!("invalid latitude in {s:?}"))?;
    Ok((lon, lat))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_point_accepts_negative_coordinates() {
        assert_eq!(parse_point("-117.43,32.55").unwrap(), (-117.43, 32.55));
        assert_eq!(parse_point(" -117.43 , 32.55 ").unwrap(), (-117.43, 32.55));
    }

    #[test]
    fn parse_point_rejects_malformed_input() {
        assert!(parse_point("-117.43").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn cli_parses_transect_subcommand() {
        let cli = Cli::parse_from([
            "bathyreq",
            "transect",
            "--from",
            "-117.43,32.55",
            "--to",
            "-117.23,32.75",
            "--num-points",
            "50",
        ]);
        match cli.command {
            Command::Transect { num_points, .. } => assert_eq!(num_points, 50),
            _ => panic!("expected transect subcommand"),
        }
    }
}
