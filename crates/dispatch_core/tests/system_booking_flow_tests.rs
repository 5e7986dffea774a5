mod support;

use dispatch_core::booking::{CancelReason, FieldTarget, WizardState};
use dispatch_core::test_helpers::{
    fixture_route, test_point, FixedRouteEstimator, ScriptedProbe,
};

use support::{
    coordinator_with, drive_to_confirmation, drive_to_rider_search, from_point,
    started_coordinator, to_point,
};

#[test]
fn full_wizard_path_reaches_rider_search() {
    let (mut coordinator, _handle) = started_coordinator();

    coordinator.select_field(FieldTarget::From);
    assert_eq!(
        coordinator.wizard_state(),
        WizardState::LocationSearch(FieldTarget::From)
    );

    coordinator.choose_place("place-a", "Market St", Some(from_point()));
    assert_eq!(
        coordinator.wizard_state(),
        WizardState::Idle,
        "one endpoint set keeps the wizard on plain inputs"
    );

    coordinator.select_field(FieldTarget::To);
    coordinator.choose_place("place-b", "Ocean Beach", Some(to_point()));
    assert_eq!(
        coordinator.wizard_state(),
        WizardState::VehicleSelection,
        "a resolved route gates the wizard forward"
    );
    let booking = coordinator.booking();
    let route = booking.route.expect("route estimated");
    assert!((route.distance_km - 5.2).abs() < 1e-9);
    assert!((route.duration_min - 14.0).abs() < 1e-9);

    coordinator.choose_vehicle("car");
    assert_eq!(coordinator.wizard_state(), WizardState::Confirmation);

    coordinator.confirm();
    assert_eq!(coordinator.wizard_state(), WizardState::RiderSearch);

    let telemetry = coordinator.telemetry();
    assert_eq!(telemetry.confirmed_bookings.len(), 1);
    let record = &telemetry.confirmed_bookings[0];
    assert_eq!(record.vehicle_id, "car");
    // Standard car: 2.0 base + 5.2 km * 1.5.
    assert!((record.quoted_fare - 9.8).abs() < 1e-9);
    assert_eq!(record.quoted_display_price(), 10);
}

#[test]
fn route_failure_keeps_the_wizard_ungated() {
    let (mut coordinator, _handle) = coordinator_with(
        Box::new(ScriptedProbe::always(test_point())),
        Box::new(FixedRouteEstimator::failing()),
    );
    coordinator.start();

    coordinator.select_field(FieldTarget::From);
    coordinator.choose_place("place-a", "Market St", Some(from_point()));
    coordinator.select_field(FieldTarget::To);
    coordinator.choose_place("place-b", "Ocean Beach", Some(to_point()));

    assert_eq!(coordinator.wizard_state(), WizardState::Idle);
    assert!(coordinator.booking().route.is_none());
    assert_eq!(coordinator.telemetry().route_failures, 1);

    // With no route there is no vehicle step to act on.
    coordinator.choose_vehicle("car");
    assert_eq!(coordinator.wizard_state(), WizardState::Idle);
    assert!(coordinator.booking().selected_vehicle.is_none());
}

#[test]
fn unresolved_place_coordinates_do_not_request_a_route() {
    let (mut coordinator, _handle) = started_coordinator();

    coordinator.select_field(FieldTarget::From);
    coordinator.choose_place("place-a", "Market St", None);
    coordinator.select_field(FieldTarget::To);
    coordinator.choose_place("place-b", "Ocean Beach", Some(to_point()));

    assert_eq!(coordinator.wizard_state(), WizardState::Idle);
    assert!(coordinator.booking().route.is_none());
    assert_eq!(coordinator.telemetry().route_failures, 0, "estimator never queried");
}

#[test]
fn cancel_from_rider_search_requires_a_reason() {
    let (mut coordinator, _handle) = started_coordinator();
    drive_to_rider_search(&mut coordinator);
    assert_eq!(coordinator.wizard_state(), WizardState::RiderSearch);

    coordinator.cancel(None);
    assert_eq!(
        coordinator.wizard_state(),
        WizardState::RiderSearch,
        "the reason gate holds"
    );
    let booking = coordinator.booking();
    assert!(booking.from_coords.is_some());
    assert!(booking.selected_vehicle.is_some());

    coordinator.cancel(Some(CancelReason::WaitTooLong));
    assert_eq!(coordinator.wizard_state(), WizardState::Idle);
    let booking = coordinator.booking();
    assert!(booking.from_place.is_none());
    assert!(booking.to_place.is_none());
    assert!(booking.from_coords.is_none());
    assert!(booking.to_coords.is_none());
    assert!(booking.route.is_none());
    assert!(booking.selected_vehicle.is_none());

    let telemetry = coordinator.telemetry();
    assert_eq!(telemetry.cancelled_bookings.len(), 1);
    assert_eq!(
        telemetry.cancelled_bookings[0].reason,
        Some(CancelReason::WaitTooLong)
    );
}

#[test]
fn hard_cancel_resets_from_any_other_state_without_a_reason() {
    let (mut coordinator, _handle) = started_coordinator();

    drive_to_confirmation(&mut coordinator);
    assert_eq!(coordinator.wizard_state(), WizardState::Confirmation);
    coordinator.cancel(None);
    assert_eq!(coordinator.wizard_state(), WizardState::Idle);
    assert!(coordinator.booking().selected_vehicle.is_none());

    coordinator.select_field(FieldTarget::From);
    coordinator.cancel(None);
    assert_eq!(coordinator.wizard_state(), WizardState::Idle);
}

#[test]
fn back_returns_from_confirmation_to_vehicle_selection() {
    let (mut coordinator, _handle) = started_coordinator();
    drive_to_confirmation(&mut coordinator);

    coordinator.back();
    assert_eq!(coordinator.wizard_state(), WizardState::VehicleSelection);
    // The route survives; only the step moved back.
    assert!(coordinator.booking().route.is_some());

    coordinator.choose_vehicle("premium");
    assert_eq!(coordinator.wizard_state(), WizardState::Confirmation);
    assert_eq!(
        coordinator.booking().selected_vehicle.as_deref(),
        Some("premium")
    );
}

#[test]
fn rider_search_always_carries_all_three_fields() {
    // Try to force rider search from every state the wizard can sit in;
    // the only path that lands there is the complete one.
    let (mut coordinator, _handle) = started_coordinator();
    coordinator.confirm();
    assert_ne!(coordinator.wizard_state(), WizardState::RiderSearch);

    coordinator.select_field(FieldTarget::From);
    coordinator.confirm();
    assert_ne!(coordinator.wizard_state(), WizardState::RiderSearch);

    coordinator.choose_place("place-a", "Market St", Some(from_point()));
    coordinator.confirm();
    assert_ne!(coordinator.wizard_state(), WizardState::RiderSearch);

    coordinator.select_field(FieldTarget::To);
    coordinator.choose_place("place-b", "Ocean Beach", Some(to_point()));
    coordinator.confirm();
    assert_ne!(
        coordinator.wizard_state(),
        WizardState::RiderSearch,
        "vehicle still unset"
    );

    coordinator.choose_vehicle("car");
    coordinator.confirm();
    assert_eq!(coordinator.wizard_state(), WizardState::RiderSearch);
    assert!(coordinator.booking().ready_for_rider_search());
}

#[test]
fn search_history_is_bounded_deduplicated_and_recent_first() {
    let (mut coordinator, _handle) = started_coordinator();

    for i in 0..12 {
        coordinator.select_field(FieldTarget::From);
        coordinator.choose_place(&format!("place-{i}"), &format!("Place {i}"), Some(from_point()));
        coordinator.cancel(None);
    }
    let history = coordinator.search_history();
    assert_eq!(history.len(), 10);
    assert_eq!(history[0].place_id, "place-11");

    // Re-selecting an old entry moves it to the front without growing.
    coordinator.select_field(FieldTarget::From);
    coordinator.choose_place("place-5", "Place 5", Some(from_point()));
    let history = coordinator.search_history();
    assert_eq!(history.len(), 10);
    assert_eq!(history[0].place_id, "place-5");
    let dupes = history.iter().filter(|e| e.place_id == "place-5").count();
    assert_eq!(dupes, 1);
}

#[test]
fn vehicle_fixture_prices_match_the_rate_card() {
    use dispatch_core::pricing::{display_price, fare, VehicleOption};

    let car = VehicleOption {
        id: "car".into(),
        name: "Car".into(),
        base_price: 2.0,
        per_km_rate: 1.5,
    };
    assert_eq!(display_price(fare(&car, 10.0)), 17);

    let premium = VehicleOption {
        id: "premium".into(),
        name: "Premium".into(),
        base_price: 50.0,
        per_km_rate: 12.0,
    };
    let amount = fare(&premium, fixture_route().distance_km);
    assert!((amount - 112.4).abs() < 1e-9);
    assert_eq!(display_price(amount), 112);
}
