//! Geodesic distance on the WGS84 ellipsoid

use geographiclib_rs::{Geodesic, InverseGeodesic};
use serde::Serialize;
use std::fmt;

use crate::models::Coordinate;

/// Distance between the two resolved locations of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceResult {
    /// Full-precision distance in kilometers
    pub kilometers: f64,
}

impl DistanceResult {
    /// Kilometers rounded to two decimals, for display only
    #[must_use]
    pub fn rounded(&self) -> f64 {
        (self.kilometers * 100.0).round() / 100.0
    }
}

impl fmt::Display for DistanceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} km", self.kilometers)
    }
}

/// Computes ellipsoidal geodesic distances between coordinates.
///
/// Uses Karney's algorithm on the WGS84 ellipsoid, which converges for every
/// pair of points including nearly antipodal ones. Degrees are fed in as-is.
pub struct DistanceCalculator {
    geodesic: Geodesic,
}

impl Default for DistanceCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl DistanceCalculator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            geodesic: Geodesic::wgs84(),
        }
    }

    /// Shortest path over the ellipsoid surface, in kilometers
    #[must_use]
    pub fn distance_km(&self, a: &Coordinate, b: &Coordinate) -> f64 {
        if a == b {
            return 0.0;
        }
        let meters: f64 = self.geodesic.inverse(
            a.latitude(),
            a.longitude(),
            b.latitude(),
            b.longitude(),
        );
        meters.abs() / 1000.0
    }

    #[must_use]
    pub fn measure(&self, a: &Coordinate, b: &Coordinate) -> DistanceResult {
        DistanceResult {
            kilometers: self.distance_km(a, b),
        }
    }
}
