pub mod accept_resolved;
pub mod availability_toggled;
pub mod back_requested;
pub mod cancel_requested;
pub mod channel_lifecycle;
pub mod confirm_requested;
pub mod field_selected;
pub mod heartbeat_tick;
pub mod offer_accept;
pub mod offer_countdown;
pub mod offer_decline;
pub mod offer_received;
pub mod panel_settle;
pub mod place_chosen;
pub mod reconnect_attempt;
pub mod route_requested;
pub mod session_started;
pub mod vehicle_chosen;
