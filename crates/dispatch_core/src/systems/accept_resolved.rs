use bevy_ecs::prelude::{Commands, Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, EventSubject};
use crate::ecs::{OfferState, RideOffer};
use crate::inbox::{AcceptInFlight, OfferQueue};
use crate::telemetry::SessionTelemetry;

/// Finalizes a successful accept emit: the offer becomes Accepted, leaves
/// the queue, and the in-flight token is released. There is no
/// confirmation protocol for "another driver already accepted": a losing
/// accept is never resolved differently by the server in the current
/// design, so the emit is treated as resolution.
pub fn accept_resolved_system(
    event: Res<CurrentEvent>,
    mut queue: ResMut<OfferQueue>,
    mut in_flight: ResMut<AcceptInFlight>,
    mut commands: Commands,
    mut offers: Query<&mut RideOffer>,
    mut telemetry: ResMut<SessionTelemetry>,
) {
    if event.0.kind != EventKind::AcceptResolved {
        return;
    }
    let Some(EventSubject::Offer(entity)) = event.0.subject else {
        return;
    };
    let Ok(mut offer) = offers.get_mut(entity) else {
        return;
    };
    if offer.state != OfferState::Accepting {
        return;
    }

    offer.state = OfferState::Accepted;
    queue.remove(entity);
    if in_flight.0 == Some(entity) {
        in_flight.0 = None;
    }
    commands.entity(entity).despawn();
    telemetry.offers_accepted += 1;
}
