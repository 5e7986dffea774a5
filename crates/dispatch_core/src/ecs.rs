//! Core session state: driver presence and inbound ride offers.

use bevy_ecs::prelude::{Component, Resource};
use serde_json::Value;

use crate::geo::GeoPoint;
use crate::messages::RideRequestMsg;

/// One device position fix, stamped with session time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoSample {
    pub point: GeoPoint,
    pub timestamp_ms: u64,
    pub accuracy_m: f64,
}

/// The driver's live presence. Created at session start; mutated by the
/// heartbeat loop and availability toggling; destroyed (after an explicit
/// logged-out broadcast) at logout.
#[derive(Debug, Clone, Resource)]
pub struct DriverPresence {
    pub driver_id: String,
    pub is_online: bool,
    pub is_available: bool,
    pub last_location: Option<GeoSample>,
}

impl DriverPresence {
    pub fn new(driver_id: impl Into<String>) -> Self {
        Self {
            driver_id: driver_id.into(),
            is_online: false,
            is_available: true,
            last_location: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferState {
    Pending,
    Accepting,
    Accepted,
    Declined,
    Expired,
}

impl OfferState {
    /// Terminal states remove the offer from the active queue.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OfferState::Accepted | OfferState::Declined | OfferState::Expired
        )
    }
}

/// One inbound ride offer. Rendering consumers read these; only the offer
/// systems mutate them.
#[derive(Debug, Clone, Component)]
pub struct RideOffer {
    pub correlation_id: String,
    pub header: RideRequestMsg,
    /// Verbatim inbound body, echoed back on accept.
    pub payload: Value,
    /// Session time when the offer arrived.
    pub received_at: u64,
    /// `received_at` + the offer TTL. Fixed and immutable once created.
    pub expires_at: u64,
    pub state: OfferState,
    /// Whole seconds left on the accept window, for the countdown badge.
    pub remaining_secs: u64,
}

impl RideOffer {
    pub fn remaining_ms(&self, now: u64) -> u64 {
        self.expires_at.saturating_sub(now)
    }
}
