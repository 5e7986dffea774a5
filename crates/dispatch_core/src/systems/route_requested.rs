use bevy_ecs::prelude::{Res, ResMut};
use tracing::debug;

use crate::booking::{BookingSession, WizardState};
use crate::clock::{CurrentEvent, EventKind, SessionClock};
use crate::panel::PanelState;
use crate::routing::RouteEstimatorResource;
use crate::systems::panel_settle::request_panel_settle;
use crate::telemetry::SessionTelemetry;

/// Runs the route estimate once both endpoints are concrete. Success gates
/// the wizard forward into `VehicleSelection`; failure leaves
/// distance/duration unset and the wizard at `Idle`; no user-facing error
/// is raised here.
pub fn route_requested_system(
    mut clock: ResMut<SessionClock>,
    event: Res<CurrentEvent>,
    estimator: Res<RouteEstimatorResource>,
    mut session: ResMut<BookingSession>,
    mut panel: ResMut<PanelState>,
    mut telemetry: ResMut<SessionTelemetry>,
) {
    if event.0.kind != EventKind::RouteRequested {
        return;
    }
    if session.route.is_some() {
        return;
    }
    let (Some(from), Some(to)) = (session.from_coords, session.to_coords) else {
        return;
    };

    match estimator.0.estimate(from, to) {
        Some(route) => {
            session.route = Some(route);
            if session.state == WizardState::Idle {
                session.state = WizardState::VehicleSelection;
                request_panel_settle(&mut clock, &mut panel);
            }
        }
        None => {
            telemetry.route_failures += 1;
            debug!("route estimation failed; wizard stays ungated");
        }
    }
}
