//! Session runner: advances the clock and routes events into the ECS.
//!
//! Clock progression and event routing happen here, outside systems. Each
//! step pops the next event from [`SessionClock`], inserts it as
//! [`CurrentEvent`], then runs the schedule.

use bevy_ecs::prelude::Res;
use bevy_ecs::prelude::{Schedule, World};
use bevy_ecs::schedule::{apply_deferred, IntoSystemConfigs};

use crate::clock::{CurrentEvent, EventKind, SessionClock};
use crate::systems::{
    accept_resolved::accept_resolved_system, availability_toggled::availability_toggled_system,
    back_requested::back_requested_system, cancel_requested::cancel_requested_system,
    channel_lifecycle::channel_lifecycle_system, confirm_requested::confirm_requested_system,
    field_selected::field_selected_system, heartbeat_tick::heartbeat_tick_system,
    offer_accept::offer_accept_system, offer_countdown::offer_countdown_system,
    offer_decline::offer_decline_system, offer_received::offer_received_system,
    panel_settle::panel_settle_system, place_chosen::place_chosen_system,
    reconnect_attempt::reconnect_attempt_system, route_requested::route_requested_system,
    session_started::session_started_system, vehicle_chosen::vehicle_chosen_system,
};

// Condition functions for each event kind
fn is_session_started(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::SessionStarted)
        .unwrap_or(false)
}

fn is_heartbeat_tick(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::HeartbeatTick)
        .unwrap_or(false)
}

fn is_availability_toggled(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::AvailabilityToggled)
        .unwrap_or(false)
}

fn is_channel_lifecycle(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::ChannelLifecycle)
        .unwrap_or(false)
}

fn is_reconnect_attempt(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::ReconnectAttempt)
        .unwrap_or(false)
}

fn is_offer_received(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::OfferReceived)
        .unwrap_or(false)
}

fn is_offer_countdown(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::OfferCountdown)
        .unwrap_or(false)
}

fn is_accept_requested(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::AcceptRequested)
        .unwrap_or(false)
}

fn is_accept_resolved(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::AcceptResolved)
        .unwrap_or(false)
}

fn is_decline_requested(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::DeclineRequested)
        .unwrap_or(false)
}

fn is_field_selected(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::FieldSelected)
        .unwrap_or(false)
}

fn is_place_chosen(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::PlaceChosen)
        .unwrap_or(false)
}

fn is_route_requested(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::RouteRequested)
        .unwrap_or(false)
}

fn is_vehicle_chosen(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::VehicleChosen)
        .unwrap_or(false)
}

fn is_confirm_requested(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::ConfirmRequested)
        .unwrap_or(false)
}

fn is_back_requested(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::BackRequested)
        .unwrap_or(false)
}

fn is_cancel_requested(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::CancelRequested)
        .unwrap_or(false)
}

fn is_panel_settle(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::PanelSettle)
        .unwrap_or(false)
}

/// Runs one step: pops the next event, inserts it as [`CurrentEvent`], then
/// runs the schedule. Returns `true` if an event was processed.
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> bool {
    let event = match world.resource_mut::<SessionClock>().pop_next() {
        Some(e) => e,
        None => return false,
    };
    world.insert_resource(CurrentEvent(event));
    schedule.run(world);
    true
}

/// Processes every event due at the current session time. Used to pump
/// synchronous user actions scheduled at `now` without letting time move.
pub fn run_due_events(world: &mut World, schedule: &mut Schedule) -> usize {
    let mut steps = 0;
    loop {
        let now = world.resource::<SessionClock>().now();
        let due = world
            .resource::<SessionClock>()
            .next_event_time()
            .is_some_and(|t| t <= now);
        if !due || !run_next_event(world, schedule) {
            break;
        }
        steps += 1;
    }
    steps
}

/// Advances the session to `target_ms`, processing every event due on the
/// way, then settles `now` at the target. Self-rescheduling chains
/// (heartbeats, countdowns) keep the heap non-empty, so this is the only
/// bounded way to move time. Returns the number of steps executed.
pub fn advance_to(world: &mut World, schedule: &mut Schedule, target_ms: u64) -> usize {
    let mut steps = 0;
    loop {
        let due = world
            .resource::<SessionClock>()
            .next_event_time()
            .is_some_and(|t| t <= target_ms);
        if !due || !run_next_event(world, schedule) {
            break;
        }
        steps += 1;
    }
    world.resource_mut::<SessionClock>().advance_now_to(target_ms);
    steps
}

/// Builds the session schedule: all event-reacting systems plus
/// [`apply_deferred`] so spawned/despawned offers are applied before the
/// next step. Systems are conditionally executed based on event type.
pub fn session_schedule() -> Schedule {
    let mut schedule = Schedule::default();

    schedule.add_systems((
        // SessionStarted
        session_started_system.run_if(is_session_started),
        // HeartbeatTick
        heartbeat_tick_system.run_if(is_heartbeat_tick),
        // AvailabilityToggled
        availability_toggled_system.run_if(is_availability_toggled),
        // ChannelLifecycle
        channel_lifecycle_system.run_if(is_channel_lifecycle),
        // ReconnectAttempt
        reconnect_attempt_system.run_if(is_reconnect_attempt),
        // OfferReceived
        offer_received_system.run_if(is_offer_received),
        // OfferCountdown
        offer_countdown_system.run_if(is_offer_countdown),
        // AcceptRequested
        offer_accept_system.run_if(is_accept_requested),
        // AcceptResolved
        accept_resolved_system.run_if(is_accept_resolved),
        // DeclineRequested
        offer_decline_system.run_if(is_decline_requested),
    ));

    schedule.add_systems((
        // FieldSelected
        field_selected_system.run_if(is_field_selected),
        // PlaceChosen
        place_chosen_system.run_if(is_place_chosen),
        // RouteRequested
        route_requested_system.run_if(is_route_requested),
        // VehicleChosen
        vehicle_chosen_system.run_if(is_vehicle_chosen),
        // ConfirmRequested
        confirm_requested_system.run_if(is_confirm_requested),
        // BackRequested
        back_requested_system.run_if(is_back_requested),
        // CancelRequested
        cancel_requested_system.run_if(is_cancel_requested),
        // PanelSettle
        panel_settle_system.run_if(is_panel_settle),
        // Always run apply_deferred so despawned offers are gone before the
        // next step.
        apply_deferred,
    ));

    schedule
}
