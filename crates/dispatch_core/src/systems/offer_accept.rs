use bevy_ecs::prelude::{Query, Res, ResMut};
use tracing::warn;

use crate::channel::ChannelResource;
use crate::clock::{CurrentEvent, EventKind, EventSubject, SessionClock};
use crate::ecs::{OfferState, RideOffer};
use crate::inbox::AcceptInFlight;
use crate::messages::{AcceptMsg, OutboundMessage};
use crate::telemetry::SessionTelemetry;

/// Starts an accept for one Pending offer: takes the in-flight token, marks
/// the offer Accepting (disabling only its own controls; other offers'
/// countdowns are untouched), and emits the accept message. A second accept
/// while one is unresolved is refused. An emit failure reverts the offer to
/// Pending with its original deadline intact.
pub fn offer_accept_system(
    mut clock: ResMut<SessionClock>,
    event: Res<CurrentEvent>,
    mut in_flight: ResMut<AcceptInFlight>,
    mut channel: ResMut<ChannelResource>,
    mut offers: Query<&mut RideOffer>,
    mut telemetry: ResMut<SessionTelemetry>,
) {
    if event.0.kind != EventKind::AcceptRequested {
        return;
    }
    let Some(EventSubject::Offer(entity)) = event.0.subject else {
        return;
    };
    let Ok(mut offer) = offers.get_mut(entity) else {
        return;
    };
    if offer.state != OfferState::Pending {
        return;
    }
    let now = clock.now();
    if now >= offer.expires_at {
        // The countdown owns expiry; an accept racing the deadline loses.
        return;
    }
    if in_flight.0.is_some() {
        telemetry.accepts_blocked += 1;
        warn!(correlation_id = %offer.correlation_id, "accept refused: another accept in flight");
        return;
    }

    offer.state = OfferState::Accepting;
    in_flight.0 = Some(entity);

    let msg = OutboundMessage::AcceptRide(AcceptMsg {
        correlation_id: offer.correlation_id.clone(),
        payload: offer.payload.clone(),
    });
    match channel.0.send(&msg) {
        Ok(()) => {
            // The emit is the whole round trip in the current protocol;
            // resolution re-enters the loop as its own step.
            clock.schedule_at(now, EventKind::AcceptResolved, Some(EventSubject::Offer(entity)));
        }
        Err(err) => {
            warn!(%err, correlation_id = %offer.correlation_id, "accept emit failed");
            telemetry.send_failures += 1;
            offer.state = OfferState::Pending;
            in_flight.0 = None;
        }
    }
}
