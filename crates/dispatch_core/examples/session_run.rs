//! Drive one scripted dispatch shift and print session telemetry.
//!
//! Run with: cargo run -p dispatch_core --example session_run

use dispatch_core::booking::{CancelReason, FieldTarget};
use dispatch_core::session::{SessionConfig, SessionCoordinator};
use dispatch_core::test_helpers::{
    fixture_route, ride_request_payload, test_point, test_point_b, FixedRouteEstimator,
    RecordingChannel, ScriptedProbe,
};

fn main() {
    let (channel, handle) = RecordingChannel::new();
    let mut coordinator = SessionCoordinator::new(
        SessionConfig::default()
            .with_driver_id("driver-demo")
            .with_jitter_seed(123),
        Box::new(channel),
        Box::new(ScriptedProbe::always(test_point())),
        Box::new(FixedRouteEstimator::ok(fixture_route())),
    );

    coordinator.start();

    // Two offers: one expires untouched, one gets accepted.
    coordinator.on_ride_request(ride_request_payload("offer-1"));
    coordinator.advance_to(12_000);
    coordinator.on_ride_request(ride_request_payload("offer-2"));
    coordinator.accept_offer("offer-2");

    // One booked trip, then a cancelled rider search.
    coordinator.select_field(FieldTarget::From);
    coordinator.choose_place("pier-39", "Pier 39", Some(test_point()));
    coordinator.select_field(FieldTarget::To);
    coordinator.choose_place("ferry", "Ferry Building", Some(test_point_b()));
    coordinator.choose_vehicle("car");
    coordinator.confirm();
    coordinator.advance_to(30_000);
    coordinator.cancel(Some(CancelReason::WaitTooLong));

    coordinator.advance_to(60_000);
    coordinator.logout();

    let telemetry = coordinator.telemetry();
    println!("--- Session run (driver-demo, 60 s shift) ---");
    println!("Heartbeats sent: {}", telemetry.heartbeats_sent);
    println!(
        "Offers: {} received, {} accepted, {} expired, {} declined",
        telemetry.offers_received,
        telemetry.offers_accepted,
        telemetry.offers_expired,
        telemetry.offers_declined,
    );
    println!("Confirmed bookings: {}", telemetry.confirmed_bookings.len());
    for record in &telemetry.confirmed_bookings {
        println!(
            "  vehicle={} distance={:.1} km fare={} (exact {:.2})",
            record.vehicle_id,
            record.distance_km,
            record.quoted_display_price(),
            record.quoted_fare,
        );
    }
    println!("Cancelled bookings: {}", telemetry.cancelled_bookings.len());
    println!("Messages on the wire: {}", handle.sent().len());
}
