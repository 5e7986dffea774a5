use bevy_ecs::prelude::{Res, ResMut};
use tracing::warn;

use crate::channel::{ChannelResource, ChannelStatus};
use crate::clock::{CurrentEvent, EventKind, SessionClock};
use crate::ecs::DriverPresence;
use crate::heartbeat::AvailabilityChanges;
use crate::messages::OutboundMessage;
use crate::systems::heartbeat_tick::heartbeat_msg;
use crate::telemetry::SessionTelemetry;

/// Flips the availability flag and immediately re-emits the last known
/// location with it. Matching eligibility is entirely server-inferred from
/// this flag, so the re-emit is what actually takes the driver on or off
/// the market.
pub fn availability_toggled_system(
    clock: Res<SessionClock>,
    event: Res<CurrentEvent>,
    mut changes: ResMut<AvailabilityChanges>,
    mut presence: ResMut<DriverPresence>,
    mut channel: ResMut<ChannelResource>,
    status: Res<ChannelStatus>,
    mut telemetry: ResMut<SessionTelemetry>,
) {
    if event.0.kind != EventKind::AvailabilityToggled {
        return;
    }
    let Some(value) = changes.0.pop_front() else {
        return;
    };

    presence.is_available = value;

    let Some(sample) = presence.last_location else {
        // No fix yet; the next heartbeat tick carries the new flag.
        return;
    };
    if !status.is_connected() {
        return;
    }

    let msg = OutboundMessage::Heartbeat(heartbeat_msg(&presence, sample, clock.now()));
    match channel.0.send(&msg) {
        Ok(()) => telemetry.heartbeats_sent += 1,
        Err(err) => {
            warn!(%err, "availability re-emit failed");
            telemetry.send_failures += 1;
        }
    }
}
