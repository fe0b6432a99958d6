//! Trip types: the request that enters the engine and the persisted record.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TripPlan;

/// Parameters for one trip computation. Immutable once submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    pub current_location: String,
    pub pickup_location: String,
    pub dropoff_location: String,
    /// Duty hours already accumulated in the trailing 8-day window.
    pub current_cycle_hours: f64,
}

impl TripRequest {
    /// Validate the request before any computation is attempted.
    ///
    /// Returns the first problem found as a message suitable for the
    /// caller; the engine refuses to plan an invalid request.
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("current_location", &self.current_location),
            ("pickup_location", &self.pickup_location),
            ("dropoff_location", &self.dropoff_location),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{field} must not be empty"));
            }
        }
        if !self.current_cycle_hours.is_finite() {
            return Err("current_cycle_hours must be a number".to_string());
        }
        if !(0.0..=70.0).contains(&self.current_cycle_hours) {
            return Err(format!(
                "current_cycle_hours must be between 0 and 70, got {}",
                self.current_cycle_hours
            ));
        }
        Ok(())
    }
}

/// A persisted trip: the request plus the plan computed for it.
///
/// Generated once, immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub created_at: Timestamp,
    pub request: TripRequest,
    pub plan: TripPlan,
}
