use bevy_ecs::prelude::{Res, ResMut};
use tracing::{debug, warn};

use crate::channel::{ChannelResource, ChannelStatus, ReconnectPolicy};
use crate::clock::{CurrentEvent, EventKind, SessionClock};
use crate::telemetry::SessionTelemetry;

/// One client-driven reconnect attempt. Stale attempts (the transport came
/// back on its own, or the session was torn down) are no-ops.
pub fn reconnect_attempt_system(
    mut clock: ResMut<SessionClock>,
    event: Res<CurrentEvent>,
    mut channel: ResMut<ChannelResource>,
    mut status: ResMut<ChannelStatus>,
    policy: Res<ReconnectPolicy>,
    mut telemetry: ResMut<SessionTelemetry>,
) {
    if event.0.kind != EventKind::ReconnectAttempt {
        return;
    }
    let ChannelStatus::Reconnecting { attempt } = *status else {
        return;
    };

    telemetry.reconnect_attempts += 1;
    match channel.0.connect() {
        Ok(()) => {
            debug!(attempt, "channel reconnected");
            *status = ChannelStatus::Connected;
        }
        Err(err) => {
            let next = attempt + 1;
            if policy.attempts_exhausted(next) {
                warn!(%err, attempt, "reconnect retries exhausted");
                *status = ChannelStatus::Disconnected {
                    reason: format!("retries exhausted after {attempt} attempts"),
                };
            } else {
                debug!(%err, attempt, "reconnect attempt failed");
                *status = ChannelStatus::Reconnecting { attempt: next };
                clock.schedule_in(policy.delay_ms(next), EventKind::ReconnectAttempt, None);
            }
        }
    }
}
