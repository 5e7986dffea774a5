//! Realtime channel seam: the duplex connection to the dispatch backend.
//!
//! The channel is an explicitly owned object injected into the session (no
//! ambient process-wide singleton): the coordinator connects it at session
//! start, disconnects it at session end, and drives bounded reconnect
//! attempts with increasing delay when the connection drops. Offers that
//! arrive while disconnected are never received; there is no client-side
//! buffering.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::messages::OutboundMessage;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("channel is not connected")]
    NotConnected,
    #[error("connect failed: {0}")]
    ConnectFailed(String),
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Duplex message channel, authenticated per session by the implementation.
/// Implementations must be `Send + Sync` so the channel can be stored as a
/// shared ECS resource.
pub trait RealtimeChannel: Send + Sync {
    fn connect(&mut self) -> Result<(), ChannelError>;
    fn disconnect(&mut self);
    fn send(&mut self, message: &OutboundMessage) -> Result<(), ChannelError>;
}

/// ECS resource wrapping the boxed channel.
#[derive(Resource)]
pub struct ChannelResource(pub Box<dyn RealtimeChannel>);

/// Connection lifecycle notifications delivered by the channel
/// implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Connected,
    Disconnected { reason: String },
    Reconnecting { attempt: u32 },
    Reconnected { attempt: u32 },
    Error { message: String },
}

/// Lifecycle notifications delivered but not yet processed, consumed one
/// per `ChannelLifecycle` event.
#[derive(Debug, Clone, Default, Resource)]
pub struct ChannelEvents(pub std::collections::VecDeque<ChannelEvent>);

/// Current connection state as seen by the UI ("reconnecting" indicator)
/// and by emit sites, which only send while `Connected`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Resource)]
pub enum ChannelStatus {
    /// Before session start and after teardown.
    #[default]
    Offline,
    Connected,
    Reconnecting {
        attempt: u32,
    },
    /// Retries exhausted; the session stays up but nothing flows.
    Disconnected {
        reason: String,
    },
}

impl ChannelStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ChannelStatus::Connected)
    }
}

/// Bounded retry with linearly increasing delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Resource)]
pub struct ReconnectPolicy {
    pub base_delay_ms: u64,
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base_delay_ms: 2000,
            max_attempts: 5,
        }
    }
}

impl ReconnectPolicy {
    /// Delay before the given attempt (1-based). Attempt 1 waits one base
    /// delay, attempt 2 waits two, and so on.
    pub fn delay_ms(&self, attempt: u32) -> u64 {
        self.base_delay_ms * u64::from(attempt.max(1))
    }

    pub fn attempts_exhausted(&self, attempt: u32) -> bool {
        attempt > self.max_attempts
    }
}
