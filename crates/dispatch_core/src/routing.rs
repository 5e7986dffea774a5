//! Pluggable route estimation: trait abstraction over routing backends.
//!
//! Two implementations ship here:
//!
//! - **`OsrmRouteEstimator`** (feature `osrm`): calls a local/remote OSRM
//!   HTTP endpoint.
//! - **`CachedRouteEstimator`**: LRU wrapper around any estimator, keyed by
//!   the quantized origin/destination pair.
//!
//! A failed or unavailable estimate is `None`: the booking wizard must stay
//! ungated on failure, so there is deliberately no silent fallback estimate.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use bevy_ecs::prelude::Resource;
use lru::LruCache;
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Result of a route query between two coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub distance_km: f64,
    pub duration_min: f64,
    /// Lat/lng waypoints along the road, for the map widget to draw.
    pub polyline: Vec<GeoPoint>,
}

/// Trait for routing backends. Implementations must be `Send + Sync` so the
/// estimator can be stored as a shared ECS resource.
pub trait RouteEstimator: Send + Sync {
    /// Estimate a route. Returns `None` on any network or format failure.
    fn estimate(&self, origin: GeoPoint, destination: GeoPoint) -> Option<RouteSummary>;
}

/// ECS resource wrapping the boxed estimator.
#[derive(Resource)]
pub struct RouteEstimatorResource(pub Box<dyn RouteEstimator>);

// ---------------------------------------------------------------------------
// OSRM estimator (behind `osrm` feature)
// ---------------------------------------------------------------------------

#[cfg(feature = "osrm")]
pub mod osrm {
    use super::*;
    use reqwest::blocking::Client;
    use std::time::Duration;

    /// Estimates routes via an OSRM HTTP endpoint.
    pub struct OsrmRouteEstimator {
        client: Client,
        endpoint: String,
    }

    impl OsrmRouteEstimator {
        pub fn new(endpoint: &str) -> Self {
            let client = Client::builder()
                .timeout(Duration::from_secs(5))
                .build()
                .expect("failed to build HTTP client");
            Self {
                client,
                endpoint: endpoint.trim_end_matches('/').to_string(),
            }
        }
    }

    /// Minimal OSRM JSON response structures.
    #[derive(Deserialize)]
    struct OsrmResponse {
        code: String,
        routes: Option<Vec<OsrmRoute>>,
    }

    #[derive(Deserialize)]
    struct OsrmRoute {
        distance: f64, // metres
        duration: f64, // seconds
        geometry: OsrmGeometry,
    }

    #[derive(Deserialize)]
    struct OsrmGeometry {
        coordinates: Vec<Vec<f64>>, // [lng, lat]
    }

    impl RouteEstimator for OsrmRouteEstimator {
        fn estimate(&self, origin: GeoPoint, destination: GeoPoint) -> Option<RouteSummary> {
            let url = format!(
                "{}/route/v1/driving/{},{};{},{}?overview=full&geometries=geojson",
                self.endpoint, origin.lng, origin.lat, destination.lng, destination.lat,
            );

            let resp: OsrmResponse = match self.client.get(&url).send() {
                Ok(r) => match r.json() {
                    Ok(j) => j,
                    Err(_) => return None,
                },
                Err(_) => return None,
            };

            if resp.code != "Ok" {
                return None;
            }

            let route = resp.routes?.into_iter().next()?;

            // OSRM returns [lng, lat]; we store lat/lng.
            let polyline: Vec<GeoPoint> = route
                .geometry
                .coordinates
                .iter()
                .filter(|c| c.len() >= 2)
                .map(|c| GeoPoint::new(c[1], c[0]))
                .collect();

            Some(RouteSummary {
                distance_km: route.distance / 1000.0,
                duration_min: route.duration / 60.0,
                polyline,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Caching wrapper
// ---------------------------------------------------------------------------

/// Cache key: coordinates quantized to micro-degrees, directional.
fn quantize(p: GeoPoint) -> (i64, i64) {
    ((p.lat * 1e6).round() as i64, (p.lng * 1e6).round() as i64)
}

/// LRU-cached wrapper around any [`RouteEstimator`]. Only successful
/// estimates are cached; failures are retried on the next request.
pub struct CachedRouteEstimator {
    inner: Box<dyn RouteEstimator>,
    cache: Mutex<LruCache<((i64, i64), (i64, i64)), RouteSummary>>,
}

impl CachedRouteEstimator {
    pub fn new(inner: Box<dyn RouteEstimator>, capacity: usize) -> Self {
        Self {
            inner,
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity.max(1)).expect("cache capacity must be > 0"),
            )),
        }
    }
}

impl RouteEstimator for CachedRouteEstimator {
    fn estimate(&self, origin: GeoPoint, destination: GeoPoint) -> Option<RouteSummary> {
        let key = (quantize(origin), quantize(destination));

        {
            let mut cache = self.cache.lock().ok()?;
            if let Some(cached) = cache.get(&key) {
                return Some(cached.clone());
            }
        }

        let result = self.inner.estimate(origin, destination);

        if let Some(ref route) = result {
            if let Ok(mut cache) = self.cache.lock() {
                cache.put(key, route.clone());
            }
        }

        result
    }
}
