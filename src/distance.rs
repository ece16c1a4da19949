//! Distance strategies between two coordinates.
//!
//! Two metrics are kept side by side on purpose: the spherical haversine
//! distance and the WGS84 geodesic distance. They disagree by up to ~0.5%,
//! so swapping one for the other changes which entries make the top ten.

use crate::location::Coordinate;
use geo::{Distance, Geodesic, Point};
use std::fmt;

/// Mean Earth radius used by the spherical model.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance on a sphere of radius [`EARTH_RADIUS_KM`].
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let (lat1, lon1) = (a.lat.to_radians(), a.lon.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lon.to_radians());

    let h = ((lat2 - lat1) / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((lon2 - lon1) / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Shortest path on the WGS84 ellipsoid (Karney), in kilometers.
pub fn geodesic_km(a: Coordinate, b: Coordinate) -> f64 {
    let meters = Geodesic::distance(Point::new(a.lon, a.lat), Point::new(b.lon, b.lat));
    meters / 1000.0
}

/// Which distance is used to rank candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMetric {
    Haversine,
    #[default]
    Geodesic,
}

impl DistanceMetric {
    pub fn km(self, a: Coordinate, b: Coordinate) -> f64 {
        match self {
            Self::Haversine => haversine_km(a, b),
            Self::Geodesic => geodesic_km(a, b),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Haversine => write!(f, "haversine"),
            Self::Geodesic => write!(f, "geodesic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn c(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon)
    }

    #[test]
    fn test_haversine_known_values() {
        assert_eq!(haversine_km(c(0.0, 15.0), c(15.0, 0.0)) as i64, 2345);
        assert_eq!(haversine_km(c(10.0, 344.0), c(15.0, 98.0)) as i64, 12231);
        assert_relative_eq!(
            haversine_km(c(1.0, 34.1), c(75.0, 8.0)),
            8402.65873069945,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_haversine_same_point_is_zero() {
        let p = c(49.8397, 24.0297);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn test_haversine_symmetric() {
        let pairs = [
            (c(48.8566, 2.3522), c(51.5074, -0.1278)),
            (c(-33.8688, 151.2093), c(40.7128, -74.0060)),
            (c(89.9, 0.0), c(-89.9, 180.0)),
        ];
        for (a, b) in pairs {
            assert_relative_eq!(haversine_km(a, b), haversine_km(b, a), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_geodesic_one_degree_at_equator() {
        // WGS84 semi-major axis: 6378137 m * π/180
        assert_relative_eq!(geodesic_km(c(0.0, 0.0), c(0.0, 1.0)), 111.3195, epsilon = 1e-3);
        assert_relative_eq!(geodesic_km(c(0.0, 0.0), c(0.0, 0.0)), 0.0);
    }

    #[test]
    fn test_metrics_differ() {
        let origin = c(0.0, 0.0);
        let east = c(0.0, 10.0);
        let h = DistanceMetric::Haversine.km(origin, east);
        let g = DistanceMetric::Geodesic.km(origin, east);
        assert!(g - h > 1.0, "haversine={h} geodesic={g}");
        assert!((h - g).abs() / g < 0.01);
    }

    #[test]
    fn test_default_metric_is_geodesic() {
        assert_eq!(DistanceMetric::default(), DistanceMetric::Geodesic);
        assert_eq!(DistanceMetric::Geodesic.to_string(), "geodesic");
    }
}
