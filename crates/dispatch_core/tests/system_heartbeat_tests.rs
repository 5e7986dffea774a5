mod support;

use dispatch_core::geo::GeoPoint;
use dispatch_core::messages::OutboundMessage;
use dispatch_core::test_helpers::{FixedRouteEstimator, ScriptedProbe};

use support::{coordinator_with, started_coordinator};

fn heartbeats(messages: &[OutboundMessage]) -> Vec<&dispatch_core::messages::HeartbeatMsg> {
    messages
        .iter()
        .filter_map(|m| match m {
            OutboundMessage::Heartbeat(msg) => Some(msg),
            _ => None,
        })
        .collect()
}

#[test]
fn heartbeats_flow_at_the_configured_cadence() {
    let (mut coordinator, handle) = started_coordinator();
    coordinator.advance_to(20_000);

    let sent = handle.sent();
    let beats = heartbeats(&sent);
    // t = 0, 5s, 10s, 15s, 20s.
    assert_eq!(beats.len(), 5);
    let stamps: Vec<u64> = beats.iter().map(|b| b.timestamp).collect();
    assert_eq!(stamps, vec![0, 5_000, 10_000, 15_000, 20_000]);
    assert!(beats.iter().all(|b| b.driver_id == "driver-1"));
}

#[test]
fn failed_sampling_keeps_the_cadence_via_fallback() {
    let (mut coordinator, handle) = coordinator_with(
        Box::new(ScriptedProbe::failing()),
        Box::new(FixedRouteEstimator::failing()),
    );
    coordinator.start();
    coordinator.advance_to(15_000);

    let sent = handle.sent();
    let beats = heartbeats(&sent);
    assert_eq!(beats.len(), 4, "fallback keeps heartbeats flowing");
    assert_eq!(coordinator.telemetry().fallback_samples, 4);

    // Fallback fixes are near the fixed reference point.
    let reference = GeoPoint::new(37.7749, -122.4194);
    for beat in &beats {
        assert!((beat.lat - reference.lat).abs() <= 0.005);
        assert!((beat.lng - reference.lng).abs() <= 0.005);
    }

    // Deterministic jitter varies per tick but never repeats the reference
    // exactly.
    assert!(beats.windows(2).any(|w| w[0].lat != w[1].lat));
}

#[test]
fn availability_toggle_reemits_between_ticks() {
    let (mut coordinator, handle) = started_coordinator();
    coordinator.advance_to(6_000);

    coordinator.toggle_availability(false);

    let sent = handle.sent();
    let beats = heartbeats(&sent);
    let last = beats.last().expect("re-emitted heartbeat");
    assert_eq!(last.timestamp, 6_000);
    assert!(!last.is_available);
    assert!(!coordinator.presence().is_available);

    // The next scheduled tick also carries the new flag.
    coordinator.advance_to(10_000);
    let sent = handle.sent();
    let last = *heartbeats(&sent).last().expect("tick heartbeat");
    assert_eq!(last.timestamp, 10_000);
    assert!(!last.is_available);
}

#[test]
fn stop_cancels_the_loop_exactly_once_and_is_idempotent() {
    let (mut coordinator, handle) = started_coordinator();
    coordinator.advance_to(10_000);
    let before = handle.sent().len();

    coordinator.stop();
    coordinator.stop();
    coordinator.advance_to(60_000);

    assert_eq!(handle.sent().len(), before, "no emissions after teardown");
    assert!(!coordinator.presence().is_online);
    assert!(!handle.is_connected());
}

#[test]
fn restart_after_stop_resumes_the_loop() {
    let (mut coordinator, handle) = started_coordinator();
    coordinator.advance_to(5_000);
    coordinator.stop();

    coordinator.start();
    let resumed_at = coordinator.now();
    coordinator.advance_to(resumed_at + 5_000);

    let beats = handle
        .sent()
        .iter()
        .filter(|m| matches!(m, OutboundMessage::Heartbeat(_)))
        .count();
    // 0s and 5s from the first run, then two more after the restart.
    assert_eq!(beats, 4);
}
