use bevy_ecs::prelude::{Res, ResMut};

use crate::booking::{BookingSession, WizardState};
use crate::clock::{CurrentEvent, EventKind, SessionClock};
use crate::panel::PanelState;
use crate::systems::panel_settle::request_panel_settle;

/// `Confirmation -> VehicleSelection`; the only backward edge the wizard
/// defines.
pub fn back_requested_system(
    mut clock: ResMut<SessionClock>,
    event: Res<CurrentEvent>,
    mut session: ResMut<BookingSession>,
    mut panel: ResMut<PanelState>,
) {
    if event.0.kind != EventKind::BackRequested {
        return;
    }
    if session.state != WizardState::Confirmation {
        return;
    }
    session.state = WizardState::VehicleSelection;
    request_panel_settle(&mut clock, &mut panel);
}
