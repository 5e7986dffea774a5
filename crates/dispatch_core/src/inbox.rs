//! Inbound ride-offer queue state.
//!
//! Offers live as entities with a [`RideOffer`](crate::ecs::RideOffer)
//! component; this module holds the queue bookkeeping around them. Ordering
//! is purely arrival order, with no priority and no reordering.

use std::collections::VecDeque;

use bevy_ecs::prelude::{Entity, Resource};
use serde_json::Value;

use crate::messages::RideRequestMsg;

/// Default accept/decline window.
pub const DEFAULT_OFFER_TTL_MS: u64 = 10_000;

/// How long a driver has to act on an offer before it silently expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Resource)]
pub struct OfferTtl(pub u64);

impl Default for OfferTtl {
    fn default() -> Self {
        Self(DEFAULT_OFFER_TTL_MS)
    }
}

/// A parsed inbound offer waiting to be materialized by the
/// `offer_received` system. The raw payload rides along for the accept echo.
#[derive(Debug, Clone)]
pub struct InboundOffer {
    pub header: RideRequestMsg,
    pub payload: Value,
}

/// FIFO of offers delivered by the channel but not yet spawned.
#[derive(Debug, Clone, Default, Resource)]
pub struct InboundOffers(pub VecDeque<InboundOffer>);

/// Active offers in arrival order. Entries are removed on any terminal
/// state (accepted, declined, expired).
#[derive(Debug, Clone, Default, Resource)]
pub struct OfferQueue(pub Vec<Entity>);

impl OfferQueue {
    pub fn remove(&mut self, entity: Entity) {
        self.0.retain(|&e| e != entity);
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.0.contains(&entity)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// In-flight accept token: at most one offer may be `Accepting` at a time.
/// A second accept is refused until the first resolves or fails; the server
/// still arbitrates races between drivers.
#[derive(Debug, Clone, Copy, Default, Resource)]
pub struct AcceptInFlight(pub Option<Entity>);
