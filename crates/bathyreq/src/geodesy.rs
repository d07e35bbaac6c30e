//! Great-circle distances between geographic coordinates.

/// Mean radius of Earth in meters, as recommended by the IUGG.
const MEAN_EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Great-circle distance in kilometers between two `(lon, lat)` points,
/// computed with the haversine formula on the mean Earth sphere.
pub fn haversine_km(p1: (f64, f64), p2: (f64, f64)) -> f64 {
    let (lon1, lat1) = (p1.0.to_radians(), p1.1.to_radians());
    let (lon2, lat2) = (p2.0.to_radians(), p2.1.to_radians());

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    MEAN_EARTH_RADIUS_M * c / 1000.0
}

/// Cumulative great-circle distance in kilometers from the first point to
/// each point of the sequence. The first entry is always `0.0`.
pub fn cumulative_distances_km(points: &[(f64, f64)]) -> Vec<f64> {
    let mut distances = Vec::with_capacity(points.len());
    let mut total = 0.0;
    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            total += haversine_km(points[i - 1], *point);
        }
        distances.push(total);
    }
    distances
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = haversine_km((0.0, 0.0), (0.0, 1.0));
        assert_relative_eq!(d, 111.195, epsilon = 0.01);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = (-117.43, 32.55);
        let b = (-117.23, 32.75);
        assert_relative_eq!(haversine_km(a, b), haversine_km(b, a));
    }

    #[test]
    fn zero_distance_for_identical_points() {
        assert_relative_eq!(haversine_km((10.0, 20.0), (10.0, 20.0)), 0.0);
    }

    #[test]
    fn cumulative_distances_are_monotonic_from_zero() {
        let points = [(0.0, 0.0), (0.0, 0.5), (0.0, 1.0)];
        let distances = cumulative_distances_km(&points);
        assert_eq!(distances.len(), 3);
        assert_relative_eq!(distances[0], 0.0);
        assert!(distances[1] > 0.0);
        assert!(distances[2] > distances[1]);
        assert_relative_eq!(distances[2], 111.195, epsilon = 0.01);
    }
}
