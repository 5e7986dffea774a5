//! Location broadcasting: device position sampling and the fallback policy
//! that keeps heartbeats flowing when sampling fails.
//!
//! A revoked permission or platform read error never stops the loop: the
//! tick substitutes a deterministically jittered coordinate near a fixed
//! reference point instead. This masks genuine permission failures from
//! observers; the fallback count in telemetry is the only trace.

use std::collections::VecDeque;

use bevy_ecs::prelude::Resource;
use thiserror::Error;

use crate::geo::GeoPoint;

/// Default sampling cadence.
pub const DEFAULT_HEARTBEAT_INTERVAL_MS: u64 = 5000;

/// Accuracy reported for substituted fallback fixes.
pub const FALLBACK_ACCURACY_M: f64 = 500.0;

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("position read failed: {0}")]
    ReadFailed(String),
}

/// A raw position fix from the device. The heartbeat system stamps it with
/// session time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoFix {
    pub point: GeoPoint,
    pub accuracy_m: f64,
}

/// Device position source. Implementations must be `Send + Sync` so the
/// probe can be stored as a shared ECS resource.
pub trait LocationProbe: Send + Sync {
    fn sample(&mut self) -> Result<GeoFix, LocationError>;
}

/// ECS resource wrapping the boxed probe.
#[derive(Resource)]
pub struct LocationProbeResource(pub Box<dyn LocationProbe>);

/// Heartbeat loop configuration.
#[derive(Debug, Clone, Copy, Resource)]
pub struct HeartbeatConfig {
    pub interval_ms: u64,
    /// Reference point for fallback fixes when sampling fails.
    pub fallback_reference: GeoPoint,
    /// Base seed for the deterministic fallback jitter; combined with the
    /// tick timestamp so consecutive fallbacks differ.
    pub jitter_seed: u64,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_HEARTBEAT_INTERVAL_MS,
            // San Francisco city center.
            fallback_reference: GeoPoint::new(37.7749, -122.4194),
            jitter_seed: 0,
        }
    }
}

/// Pending availability toggles, consumed one per `AvailabilityToggled`
/// event.
#[derive(Debug, Clone, Default, Resource)]
pub struct AvailabilityChanges(pub VecDeque<bool>);
