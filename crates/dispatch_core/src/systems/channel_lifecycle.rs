use bevy_ecs::prelude::{Res, ResMut};
use tracing::{debug, warn};

use crate::channel::{ChannelEvent, ChannelEvents, ChannelStatus, ReconnectPolicy};
use crate::clock::{CurrentEvent, EventKind, SessionClock};
use crate::telemetry::SessionTelemetry;

/// Applies one connection lifecycle notification. A disconnect kicks off
/// the bounded, increasing-delay reconnect loop; collaborator-driven
/// reconnects just update the visible status.
pub fn channel_lifecycle_system(
    mut clock: ResMut<SessionClock>,
    event: Res<CurrentEvent>,
    mut events: ResMut<ChannelEvents>,
    mut status: ResMut<ChannelStatus>,
    policy: Res<ReconnectPolicy>,
    mut telemetry: ResMut<SessionTelemetry>,
) {
    if event.0.kind != EventKind::ChannelLifecycle {
        return;
    }
    let Some(lifecycle) = events.0.pop_front() else {
        return;
    };

    match lifecycle {
        ChannelEvent::Connected => {
            *status = ChannelStatus::Connected;
        }
        ChannelEvent::Disconnected { reason } => {
            warn!(%reason, "channel disconnected");
            // Offers arriving from here on are never received; there is no
            // client-side buffering.
            *status = ChannelStatus::Reconnecting { attempt: 1 };
            clock.schedule_in(policy.delay_ms(1), EventKind::ReconnectAttempt, None);
        }
        ChannelEvent::Reconnecting { attempt } => {
            *status = ChannelStatus::Reconnecting { attempt };
        }
        ChannelEvent::Reconnected { attempt } => {
            debug!(attempt, "channel reconnected by transport");
            *status = ChannelStatus::Connected;
        }
        ChannelEvent::Error { message } => {
            warn!(%message, "channel error");
            telemetry.channel_errors += 1;
        }
    }
}
