//! Channel message shapes.
//!
//! These are the payload shapes exchanged with the backend, not a wire
//! format: framing, acknowledgement, and authentication are owned by the
//! [`RealtimeChannel`](crate::channel::RealtimeChannel) implementation.
//! Field names serialize in camelCase to match the backend contract.

use serde::{Deserialize, Serialize};

/// Periodic location update, sent regardless of trip state. Matching
/// eligibility is entirely server-inferred from `is_available`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatMsg {
    pub lat: f64,
    pub lng: f64,
    pub driver_id: String,
    pub timestamp: u64,
    pub is_available: bool,
}

/// Final broadcast at logout: the last known heartbeat with the logged-in
/// flag cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutMsg {
    pub lat: f64,
    pub lng: f64,
    pub driver_id: String,
    pub timestamp: u64,
    pub is_available: bool,
    pub is_logged_in: bool,
}

/// Accept for an inbound offer: the inbound payload echoed verbatim, plus
/// the correlation id tying the two together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptMsg {
    pub correlation_id: String,
    pub payload: serde_json::Value,
}

/// Everything the coordinator can emit over the channel. Declines and
/// expiries are local-only and have no outbound counterpart.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundMessage {
    Heartbeat(HeartbeatMsg),
    AcceptRide(AcceptMsg),
    Logout(LogoutMsg),
}

/// Typed header of an inbound new-ride-request. The raw payload is kept
/// alongside (see [`crate::inbox::InboundOffer`]) so the accept echo
/// preserves fields this client does not model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideRequestMsg {
    pub correlation_id: String,
    pub customer_info: serde_json::Value,
    pub pickup_name: String,
    pub drop_name: String,
    pub pickup_time: String,
    pub distance: String,
    pub travel_way: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn heartbeat_serializes_camel_case() {
        let msg = HeartbeatMsg {
            lat: 37.77,
            lng: -122.41,
            driver_id: "driver-1".into(),
            timestamp: 5000,
            is_available: true,
        };
        let value = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(
            value,
            json!({
                "lat": 37.77,
                "lng": -122.41,
                "driverId": "driver-1",
                "timestamp": 5000,
                "isAvailable": true,
            })
        );
    }

    #[test]
    fn logout_carries_cleared_login_flag() {
        let msg = LogoutMsg {
            lat: 1.0,
            lng: 2.0,
            driver_id: "driver-1".into(),
            timestamp: 9000,
            is_available: false,
            is_logged_in: false,
        };
        let value = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(value["isLoggedIn"], json!(false));
    }

    #[test]
    fn ride_request_parses_from_backend_shape() {
        let raw = json!({
            "correlationId": "req-77",
            "customerInfo": {"name": "Ada", "phone": "+1555"},
            "pickupName": "Market St",
            "dropName": "Ocean Beach",
            "pickupTime": "now",
            "distance": "6.1 km",
            "travelWay": "road",
        });
        let msg: RideRequestMsg = serde_json::from_value(raw).expect("parse");
        assert_eq!(msg.correlation_id, "req-77");
        assert_eq!(msg.pickup_name, "Market St");
        assert_eq!(msg.customer_info["name"], json!("Ada"));
    }
}
