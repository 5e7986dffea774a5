pub mod booking;
pub mod channel;
pub mod clock;
pub mod ecs;
pub mod geo;
pub mod heartbeat;
pub mod history;
pub mod inbox;
pub mod messages;
pub mod panel;
pub mod pricing;
pub mod routing;
pub mod runner;
pub mod session;
pub mod systems;
pub mod telemetry;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
