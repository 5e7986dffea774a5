use bevy_ecs::prelude::{Res, ResMut};

use crate::booking::BookingSession;
use crate::clock::{CurrentEvent, EventKind, SessionClock};
use crate::inbox::OfferQueue;
use crate::panel::{detent_for, PanelState, DETENT_SETTLE_MS};

/// Schedules the debounced recomputation if one is not already pending.
/// Every state transition calls this; transitions inside the debounce
/// window coalesce into a single settle.
pub fn request_panel_settle(clock: &mut SessionClock, panel: &mut PanelState) {
    if panel.settle_scheduled {
        return;
    }
    panel.settle_scheduled = true;
    clock.schedule_in(DETENT_SETTLE_MS, EventKind::PanelSettle, None);
}

/// The reactive path: applies the pure mapping once state has settled. The
/// immediate command path applies the same mapping at transition time, so a
/// settle over unchanged state is a no-op.
pub fn panel_settle_system(
    event: Res<CurrentEvent>,
    queue: Res<OfferQueue>,
    session: Res<BookingSession>,
    mut panel: ResMut<PanelState>,
) {
    if event.0.kind != EventKind::PanelSettle {
        return;
    }
    panel.settle_scheduled = false;
    panel.detent = detent_for(&queue, session.state);
}
