//! Test helpers: scripted collaborator doubles and common fixtures.
//!
//! This module provides shared test utilities to reduce duplication across
//! test files. Available to downstream tests via the `test-helpers` feature
//! (on by default).

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::json;

use crate::channel::{ChannelError, RealtimeChannel};
use crate::geo::GeoPoint;
use crate::heartbeat::{GeoFix, LocationError, LocationProbe};
use crate::messages::OutboundMessage;
use crate::routing::{RouteEstimator, RouteSummary};

/// A standard test coordinate (San Francisco city center area).
pub fn test_point() -> GeoPoint {
    GeoPoint::new(37.7749, -122.4194)
}

/// A second coordinate roughly 5 km from [`test_point`].
pub fn test_point_b() -> GeoPoint {
    GeoPoint::new(37.8044, -122.3910)
}

/// Canonical inbound ride-request payload with the given correlation id.
pub fn ride_request_payload(correlation_id: &str) -> serde_json::Value {
    json!({
        "correlationId": correlation_id,
        "customerInfo": {"name": "Ada", "phone": "+15550100"},
        "pickupName": "Market St",
        "dropName": "Ocean Beach",
        "pickupTime": "now",
        "distance": "6.1 km",
        "travelWay": "road",
    })
}

// ---------------------------------------------------------------------------
// Location probe double
// ---------------------------------------------------------------------------

/// Scripted device-position source. Plays back queued results, then repeats
/// the final behavior forever.
pub struct ScriptedProbe {
    script: VecDeque<Result<GeoFix, LocationError>>,
    repeat: Result<GeoFix, LocationError>,
}

impl ScriptedProbe {
    /// Always returns a good fix at `point`.
    pub fn always(point: GeoPoint) -> Self {
        Self {
            script: VecDeque::new(),
            repeat: Ok(GeoFix {
                point,
                accuracy_m: 10.0,
            }),
        }
    }

    /// Always fails, as with a revoked location permission.
    pub fn failing() -> Self {
        Self {
            script: VecDeque::new(),
            repeat: Err(LocationError::PermissionDenied),
        }
    }

    /// Plays `script` in order, then repeats `repeat`.
    pub fn script(
        script: Vec<Result<GeoFix, LocationError>>,
        repeat: Result<GeoFix, LocationError>,
    ) -> Self {
        Self {
            script: script.into(),
            repeat,
        }
    }
}

fn clone_result(r: &Result<GeoFix, LocationError>) -> Result<GeoFix, LocationError> {
    match r {
        Ok(fix) => Ok(*fix),
        Err(LocationError::PermissionDenied) => Err(LocationError::PermissionDenied),
        Err(LocationError::ReadFailed(msg)) => Err(LocationError::ReadFailed(msg.clone())),
    }
}

impl LocationProbe for ScriptedProbe {
    fn sample(&mut self) -> Result<GeoFix, LocationError> {
        match self.script.pop_front() {
            Some(result) => result,
            None => clone_result(&self.repeat),
        }
    }
}

// ---------------------------------------------------------------------------
// Channel double
// ---------------------------------------------------------------------------

/// External handle onto a [`RecordingChannel`] that has been boxed into the
/// world: inspect sent messages and script failures mid-test.
#[derive(Clone)]
pub struct ChannelHandle {
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    fail_sends: Arc<AtomicBool>,
    fail_connects: Arc<AtomicU32>,
    connected: Arc<AtomicBool>,
}

impl ChannelHandle {
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().expect("sent log lock").clone()
    }

    pub fn last_sent(&self) -> Option<OutboundMessage> {
        self.sent.lock().expect("sent log lock").last().cloned()
    }

    /// Make every subsequent send fail.
    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// Make the next `count` connect attempts fail.
    pub fn fail_next_connects(&self, count: u32) {
        self.fail_connects.store(count, Ordering::SeqCst);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

/// In-memory [`RealtimeChannel`] that records every outbound message.
pub struct RecordingChannel {
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    fail_sends: Arc<AtomicBool>,
    fail_connects: Arc<AtomicU32>,
    connected: Arc<AtomicBool>,
}

impl RecordingChannel {
    pub fn new() -> (Self, ChannelHandle) {
        let channel = Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail_sends: Arc::new(AtomicBool::new(false)),
            fail_connects: Arc::new(AtomicU32::new(0)),
            connected: Arc::new(AtomicBool::new(false)),
        };
        let handle = ChannelHandle {
            sent: Arc::clone(&channel.sent),
            fail_sends: Arc::clone(&channel.fail_sends),
            fail_connects: Arc::clone(&channel.fail_connects),
            connected: Arc::clone(&channel.connected),
        };
        (channel, handle)
    }

    /// A channel that starts already connected, for tests that skip the
    /// session-start handshake.
    pub fn connected() -> (Self, ChannelHandle) {
        let (channel, handle) = Self::new();
        channel.connected.store(true, Ordering::SeqCst);
        (channel, handle)
    }
}

impl RealtimeChannel for RecordingChannel {
    fn connect(&mut self) -> Result<(), ChannelError> {
        let remaining = self.fail_connects.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_connects.store(remaining - 1, Ordering::SeqCst);
            return Err(ChannelError::ConnectFailed("scripted failure".into()));
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn disconnect(&mut self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    fn send(&mut self, message: &OutboundMessage) -> Result<(), ChannelError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(ChannelError::NotConnected);
        }
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(ChannelError::SendFailed("scripted failure".into()));
        }
        self.sent
            .lock()
            .expect("sent log lock")
            .push(message.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Route estimator double
// ---------------------------------------------------------------------------

/// Estimator that returns a fixed summary, or always fails.
pub struct FixedRouteEstimator {
    result: Option<RouteSummary>,
}

impl FixedRouteEstimator {
    pub fn ok(summary: RouteSummary) -> Self {
        Self {
            result: Some(summary),
        }
    }

    pub fn failing() -> Self {
        Self { result: None }
    }
}

impl RouteEstimator for FixedRouteEstimator {
    fn estimate(&self, _origin: GeoPoint, _destination: GeoPoint) -> Option<RouteSummary> {
        self.result.clone()
    }
}

/// The 5.2 km / 14 min fixture route used across tests.
pub fn fixture_route() -> RouteSummary {
    RouteSummary {
        distance_km: 5.2,
        duration_min: 14.0,
        polyline: vec![test_point(), test_point_b()],
    }
}
