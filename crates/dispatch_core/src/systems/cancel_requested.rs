use bevy_ecs::prelude::{Res, ResMut};

use crate::booking::{BookingSession, CancelRequests, WizardState};
use crate::clock::{CurrentEvent, EventKind, SessionClock};
use crate::panel::PanelState;
use crate::systems::panel_settle::request_panel_settle;
use crate::telemetry::{CancelledBookingRecord, SessionTelemetry};

/// Cancels the booking wizard. From `RiderSearch` a reason from the fixed
/// list is mandatory; the dialog blocks completion without one, so a
/// reason-less request leaves state untouched. Every other active state
/// hard-resets without a reason. Cancellation is always synchronous and
/// local; the transient `Cancelled` state collapses to `Idle` with every
/// trip field cleared.
pub fn cancel_requested_system(
    mut clock: ResMut<SessionClock>,
    event: Res<CurrentEvent>,
    mut requests: ResMut<CancelRequests>,
    mut session: ResMut<BookingSession>,
    mut panel: ResMut<PanelState>,
    mut telemetry: ResMut<SessionTelemetry>,
) {
    if event.0.kind != EventKind::CancelRequested {
        return;
    }
    let Some(reason) = requests.0.pop_front() else {
        return;
    };

    match session.state {
        WizardState::Idle | WizardState::Cancelled => {}
        WizardState::RiderSearch => {
            let Some(reason) = reason else {
                // Reason gate holds: no selection, no cancel.
                return;
            };
            telemetry.cancelled_bookings.push(CancelledBookingRecord {
                reason: Some(reason),
                cancelled_at: clock.now(),
            });
            session.state = WizardState::Cancelled;
            session.reset_to_idle();
            request_panel_settle(&mut clock, &mut panel);
        }
        _ => {
            telemetry.cancelled_bookings.push(CancelledBookingRecord {
                reason,
                cancelled_at: clock.now(),
            });
            session.state = WizardState::Cancelled;
            session.reset_to_idle();
            request_panel_settle(&mut clock, &mut panel);
        }
    }
}
