use bevy_ecs::prelude::{Res, ResMut};
use tracing::warn;

use crate::booking::{BookingSession, VehicleChoices, WizardState};
use crate::clock::{CurrentEvent, EventKind, SessionClock};
use crate::panel::PanelState;
use crate::pricing::VehicleCatalog;
use crate::systems::panel_settle::request_panel_settle;

/// `VehicleSelection -> Confirmation` once a catalog vehicle is picked.
pub fn vehicle_chosen_system(
    mut clock: ResMut<SessionClock>,
    event: Res<CurrentEvent>,
    mut choices: ResMut<VehicleChoices>,
    catalog: Res<VehicleCatalog>,
    mut session: ResMut<BookingSession>,
    mut panel: ResMut<PanelState>,
) {
    if event.0.kind != EventKind::VehicleChosen {
        return;
    }
    let Some(vehicle_id) = choices.0.pop_front() else {
        return;
    };
    if session.state != WizardState::VehicleSelection {
        return;
    }
    let Some(vehicle) = catalog.get(&vehicle_id) else {
        warn!(%vehicle_id, "unknown vehicle id");
        return;
    };

    session.selected_vehicle = Some(vehicle.id.clone());
    session.state = WizardState::Confirmation;
    request_panel_settle(&mut clock, &mut panel);
}
