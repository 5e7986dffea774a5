//! Session clock: a single monotonic time source driving every deadline.
//!
//! All timed behavior in the coordinator (heartbeat cadence, per-offer
//! countdowns and expiries, panel-settle debounce, reconnect backoff) is an
//! [`Event`] in one `BinaryHeap`, ordered by timestamp. Teardown clears the
//! heap; there are no per-record timer objects to cancel individually.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::{Entity, Resource};

pub const ONE_SEC_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    SessionStarted,
    HeartbeatTick,
    AvailabilityToggled,
    ChannelLifecycle,
    ReconnectAttempt,
    OfferReceived,
    OfferCountdown,
    AcceptRequested,
    AcceptResolved,
    DeclineRequested,
    FieldSelected,
    PlaceChosen,
    RouteRequested,
    VehicleChosen,
    ConfirmRequested,
    BackRequested,
    CancelRequested,
    PanelSettle,
}

/// Entity the event is about, when it is about one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSubject {
    Offer(Entity),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub timestamp: u64,
    pub kind: EventKind,
    pub subject: Option<EventSubject>,
    /// Scheduling sequence number; ties on `timestamp` pop in arrival order.
    seq: u64,
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap by timestamp,
        // FIFO-stable for equal timestamps via the sequence number.
        other
            .timestamp
            .cmp(&self.timestamp)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The event currently being processed; inserted by the runner before each
/// schedule pass so systems can gate on it.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

#[derive(Debug, Default, Resource)]
pub struct SessionClock {
    now: u64,
    next_seq: u64,
    events: BinaryHeap<Event>,
}

impl SessionClock {
    /// Current session time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn schedule_at(&mut self, timestamp: u64, kind: EventKind, subject: Option<EventSubject>) {
        debug_assert!(timestamp >= self.now, "event timestamp must be >= current time");
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(Event {
            timestamp,
            kind,
            subject,
            seq,
        });
    }

    pub fn schedule_at_secs(&mut self, secs: u64, kind: EventKind, subject: Option<EventSubject>) {
        self.schedule_at(secs * ONE_SEC_MS, kind, subject);
    }

    pub fn schedule_in(&mut self, delta_ms: u64, kind: EventKind, subject: Option<EventSubject>) {
        self.schedule_at(self.now + delta_ms, kind, subject);
    }

    pub fn schedule_in_secs(&mut self, secs: u64, kind: EventKind, subject: Option<EventSubject>) {
        self.schedule_in(secs * ONE_SEC_MS, kind, subject);
    }

    /// Pops the next event and advances `now` to its timestamp.
    pub fn pop_next(&mut self) -> Option<Event> {
        let event = self.events.pop()?;
        self.now = event.timestamp;
        Some(event)
    }

    pub fn next_event_time(&self) -> Option<u64> {
        self.events.peek().map(|e| e.timestamp)
    }

    pub fn pending_event_count(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Moves `now` forward without processing anything. Used by the runner to
    /// settle time after draining all events due by a target timestamp.
    pub fn advance_now_to(&mut self, timestamp: u64) {
        if timestamp > self.now {
            self.now = timestamp;
        }
    }

    /// Drops every scheduled event. The single teardown point for all
    /// intervals, countdowns, and backoff timers.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_pops_events_in_time_order() {
        let mut clock = SessionClock::default();
        clock.schedule_at(10, EventKind::HeartbeatTick, None);
        clock.schedule_at(5, EventKind::OfferReceived, None);
        clock.schedule_at(20, EventKind::PanelSettle, None);

        let first = clock.pop_next().expect("first event");
        assert_eq!(first.timestamp, 5);
        assert_eq!(first.kind, EventKind::OfferReceived);
        assert_eq!(clock.now(), 5);

        let second = clock.pop_next().expect("second event");
        assert_eq!(second.timestamp, 10);
        assert_eq!(clock.now(), 10);

        let third = clock.pop_next().expect("third event");
        assert_eq!(third.timestamp, 20);
        assert_eq!(clock.now(), 20);

        assert!(clock.pop_next().is_none());
        assert!(clock.is_empty());
    }

    #[test]
    fn equal_timestamps_pop_in_arrival_order() {
        let mut clock = SessionClock::default();
        clock.schedule_at(7, EventKind::FieldSelected, None);
        clock.schedule_at(7, EventKind::PlaceChosen, None);
        clock.schedule_at(7, EventKind::RouteRequested, None);

        let kinds: Vec<EventKind> = std::iter::from_fn(|| clock.pop_next())
            .map(|e| e.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::FieldSelected,
                EventKind::PlaceChosen,
                EventKind::RouteRequested
            ]
        );
    }

    #[test]
    fn clear_drops_all_pending_events_and_keeps_now() {
        let mut clock = SessionClock::default();
        clock.schedule_in_secs(5, EventKind::HeartbeatTick, None);
        clock.schedule_in_secs(10, EventKind::OfferCountdown, None);
        clock.pop_next();
        assert_eq!(clock.now(), 5 * ONE_SEC_MS);

        clock.clear();
        assert!(clock.is_empty());
        assert_eq!(clock.pending_event_count(), 0);
        assert_eq!(clock.now(), 5 * ONE_SEC_MS);
    }

    #[test]
    fn advance_now_never_moves_backwards() {
        let mut clock = SessionClock::default();
        clock.advance_now_to(1000);
        assert_eq!(clock.now(), 1000);
        clock.advance_now_to(500);
        assert_eq!(clock.now(), 1000);
    }
}
