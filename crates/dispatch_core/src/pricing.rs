//! Fare calculation for the booking wizard.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

/// Static catalog entry for a bookable vehicle class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleOption {
    pub id: String,
    pub name: String,
    pub base_price: f64,
    pub per_km_rate: f64,
}

/// The vehicle classes offered to the driver when booking a trip on a
/// rider's behalf. Fixed for the lifetime of a session.
#[derive(Debug, Clone, Default, Resource)]
pub struct VehicleCatalog(pub Vec<VehicleOption>);

impl VehicleCatalog {
    pub fn get(&self, id: &str) -> Option<&VehicleOption> {
        self.0.iter().find(|v| v.id == id)
    }

    /// Default three-tier catalog.
    pub fn standard() -> Self {
        Self(vec![
            VehicleOption {
                id: "bike".into(),
                name: "Bike".into(),
                base_price: 1.0,
                per_km_rate: 0.8,
            },
            VehicleOption {
                id: "car".into(),
                name: "Car".into(),
                base_price: 2.0,
                per_km_rate: 1.5,
            },
            VehicleOption {
                id: "premium".into(),
                name: "Premium".into(),
                base_price: 5.0,
                per_km_rate: 2.4,
            },
        ])
    }
}

/// Calculate the fare for a vehicle class over a trip distance.
///
/// Formula: `fare = base_price + (distance_km * per_km_rate)`
///
/// Pure and recomputed on demand; never cached.
pub fn fare(vehicle: &VehicleOption, distance_km: f64) -> f64 {
    vehicle.base_price + distance_km * vehicle.per_km_rate
}

/// Round a fare to the nearest whole unit for display. Display-only: the
/// exact amount is what gets recorded.
pub fn display_price(amount: f64) -> i64 {
    amount.round() as i64
}
