//! Shared setup for integration tests: a coordinator wired to scripted
//! collaborators.
#![allow(dead_code)]

use dispatch_core::booking::FieldTarget;
use dispatch_core::channel::ReconnectPolicy;
use dispatch_core::geo::GeoPoint;
use dispatch_core::heartbeat::LocationProbe;
use dispatch_core::routing::RouteEstimator;
use dispatch_core::session::{SessionConfig, SessionCoordinator};
use dispatch_core::test_helpers::{
    fixture_route, ride_request_payload, test_point, test_point_b, ChannelHandle,
    FixedRouteEstimator, RecordingChannel, ScriptedProbe,
};

pub fn test_config() -> SessionConfig {
    SessionConfig::default()
        .with_driver_id("driver-1")
        .with_jitter_seed(42)
        .with_reconnect(ReconnectPolicy {
            base_delay_ms: 2000,
            max_attempts: 5,
        })
}

pub fn coordinator_with(
    probe: Box<dyn LocationProbe>,
    estimator: Box<dyn RouteEstimator>,
) -> (SessionCoordinator, ChannelHandle) {
    let (channel, handle) = RecordingChannel::new();
    let coordinator = SessionCoordinator::new(test_config(), Box::new(channel), probe, estimator);
    (coordinator, handle)
}

/// A started session with a healthy probe and the 5.2 km fixture route.
pub fn started_coordinator() -> (SessionCoordinator, ChannelHandle) {
    let (mut coordinator, handle) = coordinator_with(
        Box::new(ScriptedProbe::always(test_point())),
        Box::new(FixedRouteEstimator::ok(fixture_route())),
    );
    coordinator.start();
    (coordinator, handle)
}

/// Delivers a canonical inbound offer with the given correlation id.
pub fn deliver_offer(coordinator: &mut SessionCoordinator, correlation_id: &str) {
    coordinator.on_ride_request(ride_request_payload(correlation_id));
}

pub fn from_point() -> GeoPoint {
    test_point()
}

pub fn to_point() -> GeoPoint {
    test_point_b()
}

/// Walks the wizard from `Idle` to `Confirmation` with the fixture route
/// and the standard car.
pub fn drive_to_confirmation(coordinator: &mut SessionCoordinator) {
    coordinator.select_field(FieldTarget::From);
    coordinator.choose_place("place-a", "Market St", Some(from_point()));
    coordinator.select_field(FieldTarget::To);
    coordinator.choose_place("place-b", "Ocean Beach", Some(to_point()));
    coordinator.choose_vehicle("car");
}

/// Walks the wizard all the way into `RiderSearch`.
pub fn drive_to_rider_search(coordinator: &mut SessionCoordinator) {
    drive_to_confirmation(coordinator);
    coordinator.confirm();
}
