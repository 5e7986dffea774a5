use bevy_ecs::prelude::{Res, ResMut};
use tracing::warn;

use crate::channel::{ChannelResource, ChannelStatus, ReconnectPolicy};
use crate::clock::{CurrentEvent, EventKind, SessionClock};

/// Brings the session up: connects the injected channel (falling into the
/// reconnect loop on failure) and schedules the first heartbeat
/// immediately, so presence is populated before the first cadence gap.
pub fn session_started_system(
    mut clock: ResMut<SessionClock>,
    event: Res<CurrentEvent>,
    mut channel: ResMut<ChannelResource>,
    mut status: ResMut<ChannelStatus>,
    policy: Res<ReconnectPolicy>,
) {
    if event.0.kind != EventKind::SessionStarted {
        return;
    }

    match channel.0.connect() {
        Ok(()) => {
            *status = ChannelStatus::Connected;
        }
        Err(err) => {
            warn!(%err, "initial channel connect failed");
            *status = ChannelStatus::Reconnecting { attempt: 1 };
            clock.schedule_in(policy.delay_ms(1), EventKind::ReconnectAttempt, None);
        }
    }

    let now = clock.now();
    clock.schedule_at(now, EventKind::HeartbeatTick, None);
}
