//! Example: fetch a depth profile between two coordinates.
//!
//! Usage: cargo run --example depth_profile -- <lon1> <lat1> <lon2> <lat2>

use bathyreq::{BathyRequest, DataSource, InterpMethod};
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 5 {
        eprintln!("Usage: {} <lon1> <lat1> <lon2> <lat2>", args[0]);
        eprintln!("Example: {} -117.43 32.55 -117.23 32.75", args[0]);
        std::process::exit(1);
    }

    let lon1: f64 = args[1].parse().expect("Invalid longitude");
    let lat1: f64 = args[2].parse().expect("Invalid latitude");
    let lon2: f64 = args[3].parse().expect("Invalid longitude");
    let lat2: f64 = args[4].parse().expect("Invalid latitude");

    let req = BathyRequest::new(DataSource::Ncei, "./bathy_cache", true)
        .expect("Failed to build request client");

    println!("Fetching 25-point transect...");
    match req.get_transect((lon1, lat1), (lon2, lat2), 25, InterpMethod::Linear) {
        Ok(transect) => {
            println!("{:>10}  {:>10}  {:>9}  {:>10}", "lon", "lat", "km", "depth (m)");
            for (((lon, lat), depth), km) in transect
                .points
                .iter()
                .zip(&transect.depths)
                .zip(&transect.distances_km)
            {
                println!("{lon:10.4}  {lat:10.4}  {km:9.2}  {depth:10.1}");
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
