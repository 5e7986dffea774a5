//! Session telemetry: counters for the heartbeat/offer/channel loops and
//! records of booking outcomes.

use bevy_ecs::prelude::Resource;

use crate::booking::CancelReason;
use crate::pricing::display_price;

/// One confirmed outbound booking, recorded when the wizard enters
/// `RiderSearch`.
#[derive(Debug, Clone)]
pub struct ConfirmedBookingRecord {
    pub from_place_id: Option<String>,
    pub to_place_id: Option<String>,
    pub vehicle_id: String,
    pub distance_km: f64,
    /// Exact fare at confirmation time; rounding happens only at display.
    pub quoted_fare: f64,
    pub confirmed_at: u64,
}

impl ConfirmedBookingRecord {
    pub fn quoted_display_price(&self) -> i64 {
        display_price(self.quoted_fare)
    }
}

/// One abandoned booking, recorded on any cancel that reset trip fields.
#[derive(Debug, Clone)]
pub struct CancelledBookingRecord {
    /// Reason given by the driver; `None` for hard cancels outside
    /// `RiderSearch`, which require no reason.
    pub reason: Option<CancelReason>,
    pub cancelled_at: u64,
}

/// Collects session telemetry. Insert as a resource to record activity.
#[derive(Debug, Default, Resource)]
pub struct SessionTelemetry {
    pub heartbeats_sent: u64,
    pub fallback_samples: u64,
    pub send_failures: u64,
    pub offers_received: u64,
    pub offers_expired: u64,
    pub offers_accepted: u64,
    pub offers_declined: u64,
    /// Accepts refused because another accept was still in flight.
    pub accepts_blocked: u64,
    pub reconnect_attempts: u64,
    pub channel_errors: u64,
    pub route_failures: u64,
    pub confirmed_bookings: Vec<ConfirmedBookingRecord>,
    pub cancelled_bookings: Vec<CancelledBookingRecord>,
}
