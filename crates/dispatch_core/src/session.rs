//! Session setup and the coordinator facade.
//!
//! [`build_session`] seeds a `World` with every resource the systems need,
//! mirroring how the collaborators are injected: the channel, the location
//! probe, and the route estimator are owned objects handed in at
//! construction, never ambient globals. [`SessionCoordinator`] owns the
//! world and schedule and turns UI interactions and collaborator callbacks
//! into events on the session clock.

use bevy_ecs::prelude::{Entity, Schedule, World};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::booking::{
    BookingSession, CancelReason, CancelRequests, FieldSelections, FieldTarget, PlaceChoice,
    PlaceChoices, VehicleChoices, WizardState,
};
use crate::channel::{
    ChannelEvent, ChannelEvents, ChannelResource, ChannelStatus, RealtimeChannel, ReconnectPolicy,
};
use crate::clock::{EventKind, EventSubject, SessionClock};
use crate::ecs::{DriverPresence, RideOffer};
use crate::geo::GeoPoint;
use crate::heartbeat::{
    AvailabilityChanges, HeartbeatConfig, LocationProbe, LocationProbeResource,
    DEFAULT_HEARTBEAT_INTERVAL_MS,
};
use crate::history::SearchHistory;
use crate::inbox::{AcceptInFlight, InboundOffer, InboundOffers, OfferQueue, OfferTtl};
use crate::messages::{LogoutMsg, OutboundMessage, RideRequestMsg};
use crate::panel::{Detent, PanelState};
use crate::pricing::{VehicleCatalog, VehicleOption};
use crate::routing::{RouteEstimator, RouteEstimatorResource};
use crate::runner::{advance_to, run_due_events, session_schedule};
use crate::telemetry::SessionTelemetry;

/// Parameters for building a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub driver_id: String,
    pub heartbeat_interval_ms: u64,
    pub offer_ttl_ms: u64,
    pub reconnect: ReconnectPolicy,
    /// Reference point for fallback heartbeat fixes.
    pub fallback_reference: GeoPoint,
    /// Seed for the deterministic fallback jitter.
    pub jitter_seed: u64,
    pub vehicles: Vec<VehicleOption>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            driver_id: "driver".to_string(),
            heartbeat_interval_ms: DEFAULT_HEARTBEAT_INTERVAL_MS,
            offer_ttl_ms: OfferTtl::default().0,
            reconnect: ReconnectPolicy::default(),
            fallback_reference: HeartbeatConfig::default().fallback_reference,
            jitter_seed: 0,
            vehicles: VehicleCatalog::standard().0,
        }
    }
}

impl SessionConfig {
    pub fn with_driver_id(mut self, driver_id: impl Into<String>) -> Self {
        self.driver_id = driver_id.into();
        self
    }

    pub fn with_heartbeat_interval_ms(mut self, interval_ms: u64) -> Self {
        self.heartbeat_interval_ms = interval_ms;
        self
    }

    pub fn with_offer_ttl_ms(mut self, ttl_ms: u64) -> Self {
        self.offer_ttl_ms = ttl_ms;
        self
    }

    pub fn with_reconnect(mut self, policy: ReconnectPolicy) -> Self {
        self.reconnect = policy;
        self
    }

    pub fn with_jitter_seed(mut self, seed: u64) -> Self {
        self.jitter_seed = seed;
        self
    }

    pub fn with_vehicles(mut self, vehicles: Vec<VehicleOption>) -> Self {
        self.vehicles = vehicles;
        self
    }
}

/// Populates `world` with clock, telemetry, presence, wizard, inbox, and
/// panel state plus the injected collaborators. Caller must have already
/// created `world`; this inserts resources only.
pub fn build_session(
    world: &mut World,
    config: &SessionConfig,
    channel: Box<dyn RealtimeChannel>,
    probe: Box<dyn LocationProbe>,
    estimator: Box<dyn RouteEstimator>,
) {
    world.insert_resource(SessionClock::default());
    world.insert_resource(SessionTelemetry::default());
    world.insert_resource(DriverPresence::new(config.driver_id.clone()));
    world.insert_resource(BookingSession::default());
    world.insert_resource(SearchHistory::new());
    world.insert_resource(PanelState::default());
    world.insert_resource(OfferQueue::default());
    world.insert_resource(InboundOffers::default());
    world.insert_resource(AcceptInFlight::default());
    world.insert_resource(OfferTtl(config.offer_ttl_ms));
    world.insert_resource(FieldSelections::default());
    world.insert_resource(PlaceChoices::default());
    world.insert_resource(VehicleChoices::default());
    world.insert_resource(CancelRequests::default());
    world.insert_resource(AvailabilityChanges::default());
    world.insert_resource(ChannelEvents::default());
    world.insert_resource(ChannelStatus::default());
    world.insert_resource(config.reconnect);
    world.insert_resource(HeartbeatConfig {
        interval_ms: config.heartbeat_interval_ms,
        fallback_reference: config.fallback_reference,
        jitter_seed: config.jitter_seed,
    });
    world.insert_resource(VehicleCatalog(config.vehicles.clone()));
    world.insert_resource(ChannelResource(channel));
    world.insert_resource(LocationProbeResource(probe));
    world.insert_resource(RouteEstimatorResource(estimator));
}

/// Top-level owner of the dispatch session. Wires the heartbeat loop, the
/// offer inbox, the booking wizard, and the panel detent together and owns
/// their lifecycles; everything flows through one clock and one schedule.
pub struct SessionCoordinator {
    world: World,
    schedule: Schedule,
}

impl SessionCoordinator {
    pub fn new(
        config: SessionConfig,
        channel: Box<dyn RealtimeChannel>,
        probe: Box<dyn LocationProbe>,
        estimator: Box<dyn RouteEstimator>,
    ) -> Self {
        let mut world = World::new();
        build_session(&mut world, &config, channel, probe, estimator);
        Self {
            world,
            schedule: session_schedule(),
        }
    }

    /// Current session time in milliseconds.
    pub fn now(&self) -> u64 {
        self.world.resource::<SessionClock>().now()
    }

    /// Brings the session online: connects the channel and starts the
    /// heartbeat loop. Starting an online session is a no-op.
    pub fn start(&mut self) {
        if self.world.resource::<DriverPresence>().is_online {
            return;
        }
        self.world.resource_mut::<DriverPresence>().is_online = true;
        self.schedule_now(EventKind::SessionStarted, None);
        self.pump();
    }

    /// Tears the session down: disconnects the channel, clears every
    /// scheduled deadline, and drops all active offers. Idempotent:
    /// stopping a stopped session does nothing.
    pub fn stop(&mut self) {
        if !self.world.resource::<DriverPresence>().is_online {
            return;
        }
        self.world.resource_mut::<ChannelResource>().0.disconnect();
        *self.world.resource_mut::<ChannelStatus>() = ChannelStatus::Offline;
        self.world.resource_mut::<SessionClock>().clear();

        let offers: Vec<Entity> = self.world.resource::<OfferQueue>().0.clone();
        for entity in offers {
            self.world.despawn(entity);
        }
        self.world.resource_mut::<OfferQueue>().0.clear();
        self.world.resource_mut::<InboundOffers>().0.clear();
        self.world.resource_mut::<AcceptInFlight>().0 = None;
        self.world.resource_mut::<BookingSession>().reset_to_idle();
        *self.world.resource_mut::<PanelState>() = PanelState::default();
        self.world.resource_mut::<DriverPresence>().is_online = false;
    }

    /// Logs the driver out: broadcasts the last known heartbeat with the
    /// logged-in flag cleared, then tears the session down and destroys
    /// presence state (location, search history).
    pub fn logout(&mut self) {
        let presence = self.world.resource::<DriverPresence>().clone();
        if presence.is_online {
            if let Some(sample) = presence.last_location {
                let now = self.now();
                let msg = OutboundMessage::Logout(LogoutMsg {
                    lat: sample.point.lat,
                    lng: sample.point.lng,
                    driver_id: presence.driver_id.clone(),
                    timestamp: now,
                    is_available: presence.is_available,
                    is_logged_in: false,
                });
                if self.world.resource::<ChannelStatus>().is_connected() {
                    if let Err(err) = self.world.resource_mut::<ChannelResource>().0.send(&msg) {
                        warn!(%err, "logout broadcast failed");
                        self.world.resource_mut::<SessionTelemetry>().send_failures += 1;
                    }
                }
            }
            self.stop();
        }
        {
            let mut presence = self.world.resource_mut::<DriverPresence>();
            presence.last_location = None;
            presence.is_available = true;
        }
        self.world.resource_mut::<SearchHistory>().clear();
    }

    /// Advances session time, firing every heartbeat, countdown, debounce,
    /// and backoff deadline due on the way.
    pub fn advance_to(&mut self, target_ms: u64) {
        advance_to(&mut self.world, &mut self.schedule, target_ms);
    }

    // -----------------------------------------------------------------
    // Collaborator callbacks
    // -----------------------------------------------------------------

    /// Channel lifecycle notification from the transport.
    pub fn on_channel_event(&mut self, event: ChannelEvent) {
        self.world
            .resource_mut::<ChannelEvents>()
            .0
            .push_back(event);
        self.schedule_now(EventKind::ChannelLifecycle, None);
        self.pump();
    }

    /// Inbound new-ride-request payload from the channel. Malformed bodies
    /// are dropped at this boundary with a warning; nothing bubbles.
    pub fn on_ride_request(&mut self, payload: serde_json::Value) {
        let header: RideRequestMsg = match serde_json::from_value(payload.clone()) {
            Ok(header) => header,
            Err(err) => {
                warn!(%err, "dropping malformed ride request");
                return;
            }
        };
        self.world
            .resource_mut::<InboundOffers>()
            .0
            .push_back(InboundOffer { header, payload });
        self.schedule_now(EventKind::OfferReceived, None);
        self.pump();
    }

    // -----------------------------------------------------------------
    // Driver interactions
    // -----------------------------------------------------------------

    pub fn toggle_availability(&mut self, available: bool) {
        self.world
            .resource_mut::<AvailabilityChanges>()
            .0
            .push_back(available);
        self.schedule_now(EventKind::AvailabilityToggled, None);
        self.pump();
    }

    /// Accept the offer with this correlation id. Unknown ids are ignored.
    pub fn accept_offer(&mut self, correlation_id: &str) {
        let Some(entity) = self.find_offer(correlation_id) else {
            return;
        };
        self.schedule_now(EventKind::AcceptRequested, Some(EventSubject::Offer(entity)));
        self.pump();
    }

    /// Decline the offer with this correlation id. Unknown ids are ignored.
    pub fn decline_offer(&mut self, correlation_id: &str) {
        let Some(entity) = self.find_offer(correlation_id) else {
            return;
        };
        self.schedule_now(EventKind::DeclineRequested, Some(EventSubject::Offer(entity)));
        self.pump();
    }

    pub fn select_field(&mut self, target: FieldTarget) {
        self.world
            .resource_mut::<FieldSelections>()
            .0
            .push_back(target);
        self.schedule_now(EventKind::FieldSelected, None);
        self.pump();
    }

    pub fn choose_place(&mut self, place_id: &str, description: &str, coords: Option<GeoPoint>) {
        self.world
            .resource_mut::<PlaceChoices>()
            .0
            .push_back(PlaceChoice {
                place: crate::booking::PlaceRef {
                    place_id: place_id.to_string(),
                    description: description.to_string(),
                },
                coords,
            });
        self.schedule_now(EventKind::PlaceChosen, None);
        self.pump();
    }

    pub fn choose_vehicle(&mut self, vehicle_id: &str) {
        self.world
            .resource_mut::<VehicleChoices>()
            .0
            .push_back(vehicle_id.to_string());
        self.schedule_now(EventKind::VehicleChosen, None);
        self.pump();
    }

    pub fn confirm(&mut self) {
        self.schedule_now(EventKind::ConfirmRequested, None);
        self.pump();
    }

    pub fn back(&mut self) {
        self.schedule_now(EventKind::BackRequested, None);
        self.pump();
    }

    /// Cancel the wizard. From `RiderSearch` a reason is mandatory; a
    /// `None` reason there leaves the state unchanged.
    pub fn cancel(&mut self, reason: Option<CancelReason>) {
        self.world
            .resource_mut::<CancelRequests>()
            .0
            .push_back(reason);
        self.schedule_now(EventKind::CancelRequested, None);
        self.pump();
    }

    // -----------------------------------------------------------------
    // State accessors for rendering consumers
    // -----------------------------------------------------------------

    pub fn wizard_state(&self) -> WizardState {
        self.world.resource::<BookingSession>().state
    }

    pub fn panel_detent(&self) -> Detent {
        self.world.resource::<PanelState>().detent
    }

    pub fn channel_status(&self) -> ChannelStatus {
        self.world.resource::<ChannelStatus>().clone()
    }

    pub fn presence(&self) -> DriverPresence {
        self.world.resource::<DriverPresence>().clone()
    }

    /// Active offers in arrival order.
    pub fn offers(&self) -> Vec<RideOffer> {
        self.world
            .resource::<OfferQueue>()
            .0
            .iter()
            .filter_map(|&entity| self.world.get::<RideOffer>(entity).cloned())
            .collect()
    }

    pub fn telemetry(&self) -> &SessionTelemetry {
        self.world.resource::<SessionTelemetry>()
    }

    pub fn search_history(&self) -> Vec<crate::history::SearchHistoryEntry> {
        self.world
            .resource::<SearchHistory>()
            .recent()
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn booking(&self) -> BookingSession {
        self.world.resource::<BookingSession>().clone()
    }

    /// Direct world access for tests and embedding shells.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    // -----------------------------------------------------------------

    fn schedule_now(&mut self, kind: EventKind, subject: Option<EventSubject>) {
        let mut clock = self.world.resource_mut::<SessionClock>();
        let now = clock.now();
        clock.schedule_at(now, kind, subject);
    }

    /// Processes every event due at the current time without moving time.
    fn pump(&mut self) {
        run_due_events(&mut self.world, &mut self.schedule);
    }

    fn find_offer(&self, correlation_id: &str) -> Option<Entity> {
        self.world
            .resource::<OfferQueue>()
            .0
            .iter()
            .copied()
            .find(|&entity| {
                self.world
                    .get::<RideOffer>(entity)
                    .is_some_and(|offer| offer.correlation_id == correlation_id)
            })
    }
}
