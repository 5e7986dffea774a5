//! Outbound booking wizard: the finite state machine for requesting a trip
//! on a rider's behalf.
//!
//! States: `Idle`, `LocationSearch(from|to)`, `VehicleSelection`,
//! `Confirmation`, `RiderSearch`, and the transient `Cancelled` (observable
//! only inside the cancel transition; it resets every trip field and lands
//! on `Idle`). A route is requested only once both endpoints have concrete
//! coordinates; a failed or pending estimate keeps the wizard at `Idle`.

use std::collections::VecDeque;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::routing::RouteSummary;

/// Which trip endpoint a location search is filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldTarget {
    From,
    To,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    Idle,
    LocationSearch(FieldTarget),
    VehicleSelection,
    Confirmation,
    RiderSearch,
    /// Transient: immediately resets to `Idle`.
    Cancelled,
}

/// Fixed list of reasons a driver may give when abandoning an active rider
/// search. Cancellation from `RiderSearch` requires one; the dialog blocks
/// completion without a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CancelReason {
    WaitTooLong,
    ChangedMyMind,
    WrongPickupLocation,
    PriceTooHigh,
    Other,
}

impl CancelReason {
    pub const ALL: [CancelReason; 5] = [
        CancelReason::WaitTooLong,
        CancelReason::ChangedMyMind,
        CancelReason::WrongPickupLocation,
        CancelReason::PriceTooHigh,
        CancelReason::Other,
    ];
}

/// A place as returned by the location-search collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRef {
    pub place_id: String,
    pub description: String,
}

/// The singleton outbound-trip request being assembled. At most one is
/// active; `RiderSearch` requires `from_coords`, `to_coords`, and
/// `selected_vehicle` all set.
#[derive(Debug, Clone, Resource)]
pub struct BookingSession {
    pub from_place: Option<PlaceRef>,
    pub to_place: Option<PlaceRef>,
    pub from_coords: Option<GeoPoint>,
    pub to_coords: Option<GeoPoint>,
    pub route: Option<RouteSummary>,
    pub selected_vehicle: Option<String>,
    pub state: WizardState,
}

impl Default for BookingSession {
    fn default() -> Self {
        Self {
            from_place: None,
            to_place: None,
            from_coords: None,
            to_coords: None,
            route: None,
            selected_vehicle: None,
            state: WizardState::Idle,
        }
    }
}

impl BookingSession {
    /// Both endpoints have concrete coordinates: the precondition for
    /// requesting a route estimate.
    pub fn endpoints_ready(&self) -> bool {
        self.from_coords.is_some() && self.to_coords.is_some()
    }

    /// Everything `RiderSearch` requires.
    pub fn ready_for_rider_search(&self) -> bool {
        self.endpoints_ready() && self.selected_vehicle.is_some()
    }

    /// Clears every trip field and returns to `Idle`. The whole of the
    /// transient `Cancelled` state.
    pub fn reset_to_idle(&mut self) {
        self.from_place = None;
        self.to_place = None;
        self.from_coords = None;
        self.to_coords = None;
        self.route = None;
        self.selected_vehicle = None;
        self.state = WizardState::Idle;
    }
}

/// A place selection made while `LocationSearch` is active. Coordinates are
/// absent when the search collaborator could not resolve them.
#[derive(Debug, Clone)]
pub struct PlaceChoice {
    pub place: PlaceRef,
    pub coords: Option<GeoPoint>,
}

/// Pending user taps, consumed one per event by the booking systems.
#[derive(Debug, Clone, Default, Resource)]
pub struct FieldSelections(pub VecDeque<FieldTarget>);

#[derive(Debug, Clone, Default, Resource)]
pub struct PlaceChoices(pub VecDeque<PlaceChoice>);

#[derive(Debug, Clone, Default, Resource)]
pub struct VehicleChoices(pub VecDeque<String>);

#[derive(Debug, Clone, Default, Resource)]
pub struct CancelRequests(pub VecDeque<Option<CancelReason>>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rider_search_requires_all_three_fields() {
        let mut session = BookingSession::default();
        assert!(!session.ready_for_rider_search());

        session.from_coords = Some(GeoPoint::new(37.77, -122.41));
        session.to_coords = Some(GeoPoint::new(37.80, -122.44));
        assert!(session.endpoints_ready());
        assert!(!session.ready_for_rider_search());

        session.selected_vehicle = Some("car".into());
        assert!(session.ready_for_rider_search());
    }

    #[test]
    fn reset_clears_every_trip_field() {
        let mut session = BookingSession {
            from_place: Some(PlaceRef {
                place_id: "a".into(),
                description: "A".into(),
            }),
            from_coords: Some(GeoPoint::new(1.0, 2.0)),
            to_coords: Some(GeoPoint::new(3.0, 4.0)),
            selected_vehicle: Some("car".into()),
            state: WizardState::RiderSearch,
            ..Default::default()
        };
        session.reset_to_idle();
        assert_eq!(session.state, WizardState::Idle);
        assert!(session.from_place.is_none());
        assert!(session.from_coords.is_none());
        assert!(session.to_coords.is_none());
        assert!(session.selected_vehicle.is_none());
        assert!(session.route.is_none());
    }
}
