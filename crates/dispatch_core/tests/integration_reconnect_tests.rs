mod support;

use dispatch_core::channel::{ChannelEvent, ChannelStatus};
use dispatch_core::messages::OutboundMessage;

use support::{deliver_offer, started_coordinator};

#[test]
fn disconnect_starts_bounded_retries_with_increasing_delay() {
    let (mut coordinator, handle) = started_coordinator();
    coordinator.advance_to(1_000);

    handle.fail_next_connects(2);
    coordinator.on_channel_event(ChannelEvent::Disconnected {
        reason: "transport closed".into(),
    });
    assert_eq!(
        coordinator.channel_status(),
        ChannelStatus::Reconnecting { attempt: 1 }
    );

    // Attempt 1 fires one base delay after the disconnect and fails.
    coordinator.advance_to(3_000);
    assert_eq!(
        coordinator.channel_status(),
        ChannelStatus::Reconnecting { attempt: 2 }
    );

    // Attempt 2 waits two base delays and also fails.
    coordinator.advance_to(7_000);
    assert_eq!(
        coordinator.channel_status(),
        ChannelStatus::Reconnecting { attempt: 3 }
    );

    // Attempt 3 succeeds.
    coordinator.advance_to(13_000);
    assert_eq!(coordinator.channel_status(), ChannelStatus::Connected);
    assert_eq!(coordinator.telemetry().reconnect_attempts, 3);
}

#[test]
fn retries_exhaust_into_disconnected() {
    let (mut coordinator, handle) = started_coordinator();
    handle.fail_next_connects(u32::MAX);
    coordinator.on_channel_event(ChannelEvent::Disconnected {
        reason: "transport closed".into(),
    });

    // Delays 2s + 4s + 6s + 8s + 10s; well past them everything has fired.
    coordinator.advance_to(60_000);
    match coordinator.channel_status() {
        ChannelStatus::Disconnected { reason } => {
            assert!(reason.contains("exhausted"), "unexpected reason: {reason}")
        }
        other => panic!("expected exhausted disconnect, got {other:?}"),
    }
    assert_eq!(coordinator.telemetry().reconnect_attempts, 5);
}

#[test]
fn heartbeats_pause_while_reconnecting_and_resume_after() {
    let (mut coordinator, handle) = started_coordinator();
    coordinator.advance_to(1_000);
    let before = handle.sent().len();

    handle.fail_next_connects(1);
    coordinator.on_channel_event(ChannelEvent::Disconnected {
        reason: "transport closed".into(),
    });

    // Ticks at 5s keep sampling but nothing is emitted while down.
    coordinator.advance_to(5_500);
    assert_eq!(handle.sent().len(), before);
    assert!(coordinator.presence().last_location.is_some());

    // Attempt 1 fails at 3s, attempt 2 succeeds at 7s; the 10s tick emits.
    coordinator.advance_to(10_000);
    assert_eq!(coordinator.channel_status(), ChannelStatus::Connected);
    let beats: Vec<_> = handle
        .sent()
        .into_iter()
        .filter_map(|m| match m {
            OutboundMessage::Heartbeat(msg) => Some(msg.timestamp),
            _ => None,
        })
        .collect();
    assert!(beats.contains(&10_000));
}

#[test]
fn transport_driven_reconnect_updates_status_without_client_retries() {
    let (mut coordinator, _handle) = started_coordinator();

    coordinator.on_channel_event(ChannelEvent::Reconnecting { attempt: 1 });
    assert_eq!(
        coordinator.channel_status(),
        ChannelStatus::Reconnecting { attempt: 1 }
    );

    coordinator.on_channel_event(ChannelEvent::Reconnected { attempt: 1 });
    assert_eq!(coordinator.channel_status(), ChannelStatus::Connected);
    assert_eq!(coordinator.telemetry().reconnect_attempts, 0);
}

#[test]
fn channel_errors_are_counted_not_raised() {
    let (mut coordinator, _handle) = started_coordinator();
    coordinator.on_channel_event(ChannelEvent::Error {
        message: "ping timeout".into(),
    });
    assert_eq!(coordinator.telemetry().channel_errors, 1);
    assert_eq!(coordinator.channel_status(), ChannelStatus::Connected);
}

#[test]
fn offers_delivered_while_connected_still_flow_after_a_drop() {
    let (mut coordinator, handle) = started_coordinator();
    deliver_offer(&mut coordinator, "req-1");

    handle.fail_next_connects(0);
    coordinator.on_channel_event(ChannelEvent::Disconnected {
        reason: "transport closed".into(),
    });
    // The already-received offer keeps counting down locally.
    coordinator.advance_to(10_000);
    assert!(coordinator.offers().is_empty());
    assert_eq!(coordinator.telemetry().offers_expired, 1);
}
