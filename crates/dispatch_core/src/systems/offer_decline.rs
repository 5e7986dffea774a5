use bevy_ecs::prelude::{Commands, Query, Res, ResMut};
use tracing::debug;

use crate::clock::{CurrentEvent, EventKind, EventSubject};
use crate::ecs::{OfferState, RideOffer};
use crate::inbox::OfferQueue;
use crate::telemetry::SessionTelemetry;

/// Removes one Pending offer locally. Rejection is silent:
/// nothing is emitted for a decline, mirroring expiry.
pub fn offer_decline_system(
    event: Res<CurrentEvent>,
    mut queue: ResMut<OfferQueue>,
    mut commands: Commands,
    mut offers: Query<&mut RideOffer>,
    mut telemetry: ResMut<SessionTelemetry>,
) {
    if event.0.kind != EventKind::DeclineRequested {
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

    offer.state = OfferState::Declined;
    queue.remove(entity);
    commands.entity(entity).despawn();
    telemetry.offers_declined += 1;
    debug!(correlation_id = %offer.correlation_id, "offer declined");
}
