//! Core data model for Roadlog.
//!
//! These types represent the domain: trip requests, route geometry,
//! duty-status segments, and the planned output contract the rendering
//! layer consumes.

mod duty;
mod plan;
mod route;
mod trip;

pub use duty::{DutySegment, DutyStatus};
pub use plan::{
    ComplianceResult, DailyLog, LogEntry, RouteData, RouteSummary, TripPlan, round1, round2,
};
pub use route::{RouteGeometry, RouteInstruction, Waypoint};
pub use trip::{Trip, TripRequest};
