//! Route geometry: the opaque output of an external routing provider.

use serde::{Deserialize, Serialize};

/// A coordinate pair on the route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub lat: f64,
    pub lng: f64,
}

impl Waypoint {
    /// Render as the `"lat,lng"` string the boundary contract uses.
    pub fn to_contract(self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

/// One routing instruction, text only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteInstruction {
    pub text: String,
}

/// Ordered waypoints plus distance and time totals for one trip.
///
/// Produced by a [`RouteProvider`](crate::route::RouteProvider); the
/// engine treats it as an opaque input and never recomputes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteGeometry {
    pub waypoints: Vec<Waypoint>,
    pub instructions: Vec<RouteInstruction>,
    pub total_distance_miles: f64,
    /// Hours behind the wheel, excluding all stops.
    pub estimated_driving_time: f64,
}
