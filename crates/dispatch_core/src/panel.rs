//! Sliding-panel detent: one pure mapping from session state to a panel
//! height, with a short debounce on the reactive path.
//!
//! Two update paths exist: the immediate command applied when
//! entering `LocationSearch` (perceived responsiveness) and a debounced
//! `PanelSettle` recomputation once state settles. Both must agree with
//! [`detent_for`]; divergence is a bug.

use bevy_ecs::prelude::Resource;

use crate::booking::WizardState;
use crate::inbox::OfferQueue;

/// Debounce before the reactive recomputation applies, absorbing visual
/// flicker on rapid transitions.
pub const DETENT_SETTLE_MS: u64 = 120;

/// Fixed heights the sliding panel can snap to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detent {
    Compact,
    Half,
    Expanded,
}

/// The single source of truth for the panel height. Pending offers render
/// inside the compact detent, so the mapping currently depends only on the
/// wizard state; the inbox parameter keeps this the one place to extend.
pub fn detent_for(_inbox: &OfferQueue, wizard: WizardState) -> Detent {
    match wizard {
        WizardState::LocationSearch(_) => Detent::Expanded,
        WizardState::VehicleSelection | WizardState::Confirmation | WizardState::RiderSearch => {
            Detent::Half
        }
        WizardState::Idle | WizardState::Cancelled => Detent::Compact,
    }
}

#[derive(Debug, Clone, Copy, Resource)]
pub struct PanelState {
    pub detent: Detent,
    /// A `PanelSettle` event is already scheduled; further transitions
    /// inside the debounce window coalesce into it.
    pub settle_scheduled: bool,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            detent: Detent::Compact,
            settle_scheduled: false,
        }
    }
}
