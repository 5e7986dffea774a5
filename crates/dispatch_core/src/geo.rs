//! Geographic primitives: raw lat/lng coordinates, Haversine distance, and
//! the jittered fallback coordinate used when device sampling fails.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Haversine distance between two coordinates in kilometres.
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lon1) = (a.lat.to_radians(), a.lng.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lng.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlon = (dlon * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    6371.0 * c
}

/// Maximum jitter applied to the fallback reference point, in degrees
/// (~550 m of latitude).
const FALLBACK_JITTER_DEG: f64 = 0.005;

/// Substitute coordinate emitted when a genuine position sample is
/// unavailable: the fixed reference point plus a deterministic jitter keyed
/// by `seed`. Same seed, same point.
pub fn fallback_point(reference: GeoPoint, seed: u64) -> GeoPoint {
    let mut rng = StdRng::seed_from_u64(seed);
    GeoPoint {
        lat: reference.lat + rng.gen_range(-FALLBACK_JITTER_DEG..=FALLBACK_JITTER_DEG),
        lng: reference.lng + rng.gen_range(-FALLBACK_JITTER_DEG..=FALLBACK_JITTER_DEG),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_matches_known_pair() {
        // SF Ferry Building to SF City Hall, roughly 2.3 km apart.
        let ferry = GeoPoint::new(37.7955, -122.3937);
        let city_hall = GeoPoint::new(37.7793, -122.4193);
        let d = distance_km(ferry, city_hall);
        assert!((d - 2.9).abs() < 0.5, "unexpected distance: {d}");
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = GeoPoint::new(37.77, -122.41);
        assert!(distance_km(p, p) < 1e-9);
    }

    #[test]
    fn fallback_point_is_deterministic_and_near_reference() {
        let reference = GeoPoint::new(37.7749, -122.4194);
        let a = fallback_point(reference, 42);
        let b = fallback_point(reference, 42);
        assert_eq!(a, b);

        let c = fallback_point(reference, 43);
        assert_ne!(a, c);

        for p in [a, c] {
            assert!((p.lat - reference.lat).abs() <= FALLBACK_JITTER_DEG);
            assert!((p.lng - reference.lng).abs() <= FALLBACK_JITTER_DEG);
        }
    }
}
