use bevy_ecs::prelude::{Res, ResMut};
use tracing::{debug, warn};

use crate::channel::{ChannelResource, ChannelStatus};
use crate::clock::{CurrentEvent, EventKind, SessionClock};
use crate::ecs::{DriverPresence, GeoSample};
use crate::geo::fallback_point;
use crate::heartbeat::{HeartbeatConfig, LocationProbeResource, FALLBACK_ACCURACY_M};
use crate::messages::{HeartbeatMsg, OutboundMessage};
use crate::telemetry::SessionTelemetry;

/// Builds the outbound heartbeat for the current presence snapshot.
pub(crate) fn heartbeat_msg(presence: &DriverPresence, sample: GeoSample, now: u64) -> HeartbeatMsg {
    HeartbeatMsg {
        lat: sample.point.lat,
        lng: sample.point.lng,
        driver_id: presence.driver_id.clone(),
        timestamp: now,
        is_available: presence.is_available,
    }
}

/// One sample-and-emit pass, self-rescheduling at the configured cadence.
/// A failed position read substitutes the jittered fallback fix instead of
/// stopping the loop, so heartbeats keep flowing either way.
pub fn heartbeat_tick_system(
    mut clock: ResMut<SessionClock>,
    event: Res<CurrentEvent>,
    config: Res<HeartbeatConfig>,
    mut presence: ResMut<DriverPresence>,
    mut probe: ResMut<LocationProbeResource>,
    mut channel: ResMut<ChannelResource>,
    status: Res<ChannelStatus>,
    mut telemetry: ResMut<SessionTelemetry>,
) {
    if event.0.kind != EventKind::HeartbeatTick {
        return;
    }
    if !presence.is_online {
        return;
    }

    let now = clock.now();
    let sample = match probe.0.sample() {
        Ok(fix) => GeoSample {
            point: fix.point,
            timestamp_ms: now,
            accuracy_m: fix.accuracy_m,
        },
        Err(err) => {
            debug!(%err, "position sample failed, substituting fallback fix");
            telemetry.fallback_samples += 1;
            GeoSample {
                point: fallback_point(config.fallback_reference, config.jitter_seed.wrapping_add(now)),
                timestamp_ms: now,
                accuracy_m: FALLBACK_ACCURACY_M,
            }
        }
    };
    presence.last_location = Some(sample);

    if status.is_connected() {
        let msg = OutboundMessage::Heartbeat(heartbeat_msg(&presence, sample, now));
        match channel.0.send(&msg) {
            Ok(()) => telemetry.heartbeats_sent += 1,
            Err(err) => {
                warn!(%err, "heartbeat send failed");
                telemetry.send_failures += 1;
            }
        }
    }

    clock.schedule_in(config.interval_ms, EventKind::HeartbeatTick, None);
}
