use bevy_ecs::prelude::{Commands, Res, ResMut};
use tracing::debug;

use crate::clock::{CurrentEvent, EventKind, EventSubject, SessionClock, ONE_SEC_MS};
use crate::ecs::{OfferState, RideOffer};
use crate::inbox::{InboundOffers, OfferQueue, OfferTtl};
use crate::telemetry::SessionTelemetry;

/// Materializes one delivered offer as a Pending entity at the back of the
/// queue and starts its one-second countdown chain. `expires_at` is fixed
/// here and never moves.
pub fn offer_received_system(
    mut clock: ResMut<SessionClock>,
    event: Res<CurrentEvent>,
    ttl: Res<OfferTtl>,
    mut inbound: ResMut<InboundOffers>,
    mut queue: ResMut<OfferQueue>,
    mut commands: Commands,
    mut telemetry: ResMut<SessionTelemetry>,
) {
    if event.0.kind != EventKind::OfferReceived {
        return;
    }
    let Some(offer) = inbound.0.pop_front() else {
        return;
    };

    let now = clock.now();
    debug!(correlation_id = %offer.header.correlation_id, "ride offer received");

    let entity = commands
        .spawn(RideOffer {
            correlation_id: offer.header.correlation_id.clone(),
            header: offer.header,
            payload: offer.payload,
            received_at: now,
            expires_at: now + ttl.0,
            state: OfferState::Pending,
            remaining_secs: ttl.0 / ONE_SEC_MS,
        })
        .id();
    queue.0.push(entity);
    telemetry.offers_received += 1;

    clock.schedule_in(ONE_SEC_MS, EventKind::OfferCountdown, Some(EventSubject::Offer(entity)));
}
