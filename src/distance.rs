use crate::Sample;
use tracing::warn;

/// Mean Earth radius in meters (WGS84).
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_008.8;

/// Single-step jumps longer than this are treated as GPS drift.
pub const DEFAULT_DRIFT_THRESHOLD_M: f64 = 200.0;

/// Calculates the great circle distance between two GPS coordinates using the haversine formula.
///
/// Accurate enough for the short hops between consecutive track points; an
/// ellipsoid method such as Vincenty's would only matter over long distances.
///
/// References:
/// - R.W. Sinnott, "Virtues of the Haversine", Sky and Telescope, vol. 68, no. 2, 1984, p. 159
/// - https://en.wikipedia.org/wiki/Haversine_formula
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    // a = sin²(Δφ/2) + cos φ1 ⋅ cos φ2 ⋅ sin²(Δλ/2)
    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);

    // c = 2 ⋅ atan2(√a, √(1−a))
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_MEAN_RADIUS_M * c
}

/// Step distance between consecutive samples with drift rejection.
///
/// A step longer than the drift threshold counts as zero. The sample itself is
/// left alone; only its contribution to the running distance is discarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceEngine {
    drift_threshold_m: f64,
}

impl Default for DistanceEngine {
    fn default() -> Self {
        DistanceEngine {
            drift_threshold_m: DEFAULT_DRIFT_THRESHOLD_M,
        }
    }
}

impl DistanceEngine {
    pub fn new(drift_threshold_m: f64) -> Self {
        DistanceEngine { drift_threshold_m }
    }

    pub fn drift_threshold(&self) -> f64 {
        self.drift_threshold_m
    }

    pub fn distance(&self, a: &Sample, b: &Sample) -> f64 {
        let distance = haversine_distance(a.lat, a.lon, b.lat, b.lon);
        if distance > self.drift_threshold_m {
            warn!("discarding {distance:.2}m jump as GPS drift");
            return 0.0;
        }
        distance
    }
}

/// [`DistanceEngine::distance`] with the default 200 m drift threshold.
pub fn distance(a: &Sample, b: &Sample) -> f64 {
    DistanceEngine::default().distance(a, b)
}
