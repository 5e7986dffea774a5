use bevy_ecs::prelude::{Res, ResMut};

use crate::booking::{BookingSession, FieldSelections, WizardState};
use crate::clock::{CurrentEvent, EventKind, SessionClock};
use crate::panel::{Detent, PanelState};
use crate::systems::panel_settle::request_panel_settle;

/// `Idle -> LocationSearch(dir)`. The panel expands immediately on this
/// transition (the one place the immediate command path is used); the
/// debounced settle recomputes to the same answer.
pub fn field_selected_system(
    mut clock: ResMut<SessionClock>,
    event: Res<CurrentEvent>,
    mut selections: ResMut<FieldSelections>,
    mut session: ResMut<BookingSession>,
    mut panel: ResMut<PanelState>,
) {
    if event.0.kind != EventKind::FieldSelected {
        return;
    }
    let Some(target) = selections.0.pop_front() else {
        return;
    };
    if session.state != WizardState::Idle {
        return;
    }

    session.state = WizardState::LocationSearch(target);
    panel.detent = Detent::Expanded;
    request_panel_settle(&mut clock, &mut panel);
}
