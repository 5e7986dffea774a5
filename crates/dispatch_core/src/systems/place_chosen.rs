use bevy_ecs::prelude::{Res, ResMut};

use crate::booking::{BookingSession, FieldTarget, PlaceChoices, WizardState};
use crate::clock::{CurrentEvent, EventKind, SessionClock};
use crate::history::{SearchHistory, SearchHistoryEntry};
use crate::panel::PanelState;
use crate::systems::panel_settle::request_panel_settle;

/// Applies one place selection to the endpoint being searched and drops
/// back to `Idle`. Once both endpoints have concrete coordinates a single
/// route request is scheduled; until the estimate lands the wizard shows
/// plain inputs and does not advance.
pub fn place_chosen_system(
    mut clock: ResMut<SessionClock>,
    event: Res<CurrentEvent>,
    mut choices: ResMut<PlaceChoices>,
    mut session: ResMut<BookingSession>,
    mut history: ResMut<SearchHistory>,
    mut panel: ResMut<PanelState>,
) {
    if event.0.kind != EventKind::PlaceChosen {
        return;
    }
    let Some(choice) = choices.0.pop_front() else {
        return;
    };
    let WizardState::LocationSearch(target) = session.state else {
        return;
    };

    history.record(SearchHistoryEntry {
        place_id: choice.place.place_id.clone(),
        description: choice.place.description.clone(),
        lat: choice.coords.map(|p| p.lat),
        lng: choice.coords.map(|p| p.lng),
        timestamp_ms: clock.now(),
    });

    match target {
        FieldTarget::From => {
            session.from_place = Some(choice.place);
            session.from_coords = choice.coords;
        }
        FieldTarget::To => {
            session.to_place = Some(choice.place);
            session.to_coords = choice.coords;
        }
    }
    session.state = WizardState::Idle;

    if session.endpoints_ready() && session.route.is_none() {
        let now = clock.now();
        clock.schedule_at(now, EventKind::RouteRequested, None);
    }
    request_panel_settle(&mut clock, &mut panel);
}
