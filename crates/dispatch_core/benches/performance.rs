//! Performance benchmarks for dispatch_core using Criterion.rs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use dispatch_core::booking::{CancelReason, FieldTarget};
use dispatch_core::session::{SessionConfig, SessionCoordinator};
use dispatch_core::test_helpers::{
    fixture_route, ride_request_payload, test_point, test_point_b, FixedRouteEstimator,
    RecordingChannel, ScriptedProbe,
};

fn scripted_coordinator() -> SessionCoordinator {
    let (channel, _handle) = RecordingChannel::new();
    let mut coordinator = SessionCoordinator::new(
        SessionConfig::default().with_jitter_seed(42),
        Box::new(channel),
        Box::new(ScriptedProbe::always(test_point())),
        Box::new(FixedRouteEstimator::ok(fixture_route())),
    );
    coordinator.start();
    coordinator
}

fn bench_offer_flood(c: &mut Criterion) {
    let mut group = c.benchmark_group("offer_flood");
    for count in [10usize, 100, 500] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut coordinator = scripted_coordinator();
                for i in 0..count {
                    coordinator.on_ride_request(ride_request_payload(&format!("req-{i}")));
                }
                // Let every countdown run to expiry.
                coordinator.advance_to(20_000);
                black_box(coordinator.telemetry().offers_expired);
            });
        });
    }
    group.finish();
}

fn bench_booking_cycle(c: &mut Criterion) {
    c.bench_function("booking_cycle", |b| {
        b.iter(|| {
            let mut coordinator = scripted_coordinator();
            for _ in 0..50 {
                coordinator.select_field(FieldTarget::From);
                coordinator.choose_place("a", "A", Some(test_point()));
                coordinator.select_field(FieldTarget::To);
                coordinator.choose_place("b", "B", Some(test_point_b()));
                coordinator.choose_vehicle("car");
                coordinator.confirm();
                coordinator.cancel(Some(CancelReason::ChangedMyMind));
            }
            black_box(coordinator.telemetry().confirmed_bookings.len());
        });
    });
}

fn bench_long_idle_shift(c: &mut Criterion) {
    c.bench_function("long_idle_shift", |b| {
        b.iter(|| {
            let mut coordinator = scripted_coordinator();
            // One simulated hour of heartbeats.
            coordinator.advance_to(3_600_000);
            black_box(coordinator.telemetry().heartbeats_sent);
        });
    });
}

criterion_group!(
    benches,
    bench_offer_flood,
    bench_booking_cycle,
    bench_long_idle_shift
);
criterion_main!(benches);
