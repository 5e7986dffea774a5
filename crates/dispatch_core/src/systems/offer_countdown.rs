use bevy_ecs::prelude::{Commands, Query, Res, ResMut};
use tracing::debug;

use crate::clock::{CurrentEvent, EventKind, EventSubject, SessionClock, ONE_SEC_MS};
use crate::ecs::{OfferState, RideOffer};
use crate::inbox::OfferQueue;
use crate::telemetry::SessionTelemetry;

/// One-second tick for a single offer's accept window. At the fixed
/// deadline the offer expires and is silently removed; the local
/// auto-decline sends nothing over the channel; the server times out
/// unanswered offers on its own. Ticks for resolved or despawned offers
/// are stale and do nothing.
pub fn offer_countdown_system(
    mut clock: ResMut<SessionClock>,
    event: Res<CurrentEvent>,
    mut queue: ResMut<OfferQueue>,
    mut commands: Commands,
    mut offers: Query<&mut RideOffer>,
    mut telemetry: ResMut<SessionTelemetry>,
) {
    if event.0.kind != EventKind::OfferCountdown {
        return;
    }
    let Some(EventSubject::Offer(entity)) = event.0.subject else {
        return;
    };
    let Ok(mut offer) = offers.get_mut(entity) else {
        return;
    };
    if offer.state != OfferState::Pending {
        // Accepting or terminal: resolution owns the record now, the chain
        // ends here.
        return;
    }

    let now = clock.now();
    if now >= offer.expires_at {
        offer.state = OfferState::Expired;
        queue.remove(entity);
        commands.entity(entity).despawn();
        telemetry.offers_expired += 1;
        debug!(correlation_id = %offer.correlation_id, "offer expired");
        return;
    }

    offer.remaining_secs = offer.remaining_ms(now) / ONE_SEC_MS;
    clock.schedule_in(ONE_SEC_MS, EventKind::OfferCountdown, Some(EventSubject::Offer(entity)));
}
