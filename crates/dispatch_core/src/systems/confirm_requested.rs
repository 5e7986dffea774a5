use bevy_ecs::prelude::{Res, ResMut};

use crate::booking::{BookingSession, WizardState};
use crate::clock::{CurrentEvent, EventKind, SessionClock};
use crate::panel::PanelState;
use crate::pricing::{fare, VehicleCatalog};
use crate::systems::panel_settle::request_panel_settle;
use crate::telemetry::{ConfirmedBookingRecord, SessionTelemetry};

/// `Confirmation -> RiderSearch`. Entering rider search with any of
/// from/to/vehicle missing is a programmer error: the wizard can only reach
/// `Confirmation` with all three set.
pub fn confirm_requested_system(
    mut clock: ResMut<SessionClock>,
    event: Res<CurrentEvent>,
    catalog: Res<VehicleCatalog>,
    mut session: ResMut<BookingSession>,
    mut panel: ResMut<PanelState>,
    mut telemetry: ResMut<SessionTelemetry>,
) {
    if event.0.kind != EventKind::ConfirmRequested {
        return;
    }
    if session.state != WizardState::Confirmation {
        return;
    }
    debug_assert!(
        session.ready_for_rider_search(),
        "confirmation reached without from/to/vehicle all set"
    );
    let (Some(route), Some(vehicle_id)) = (session.route.clone(), session.selected_vehicle.clone())
    else {
        return;
    };
    let Some(vehicle) = catalog.get(&vehicle_id) else {
        return;
    };

    let now = clock.now();
    telemetry.confirmed_bookings.push(ConfirmedBookingRecord {
        from_place_id: session.from_place.as_ref().map(|p| p.place_id.clone()),
        to_place_id: session.to_place.as_ref().map(|p| p.place_id.clone()),
        vehicle_id: vehicle.id.clone(),
        distance_km: route.distance_km,
        quoted_fare: fare(vehicle, route.distance_km),
        confirmed_at: now,
    });
    session.state = WizardState::RiderSearch;
    request_panel_settle(&mut clock, &mut panel);
}
