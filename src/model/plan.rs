//! The planned trip: everything the rendering layer consumes.
//!
//! Field names and shapes here are the boundary contract — changing them
//! breaks the client that draws the map, the compliance panel, and the
//! log grids.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::{DutyStatus, RouteInstruction};

/// Complete output of one trip computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    pub route_summary: RouteSummary,
    pub route_data: RouteData,
    pub hos_compliance: ComplianceResult,
    pub daily_logs: Vec<DailyLog>,
}

/// Headline figures for the whole trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub total_distance_miles: f64,
    /// Hours behind the wheel.
    pub estimated_driving_time: f64,
    /// Driving plus pickup, dropoff, and fuel-stop time.
    pub total_duty_time: f64,
    pub fuel_stops_needed: u32,
}

/// The route as the map layer wants it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteData {
    pub instructions: Vec<RouteInstruction>,
    /// `"lat,lng"` strings, in travel order.
    pub waypoints: Vec<String>,
}

/// HOS compliance verdict for the planned schedule.
///
/// Compliance issues are output data describing regulatory problems with
/// an otherwise successfully computed plan — they are not errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceResult {
    pub is_compliant: bool,
    pub compliance_issues: Vec<String>,
    pub requires_multi_day: bool,
    pub projected_cycle_hours: f64,
}

/// One calendar day's complete duty record.
///
/// Entries are contiguous, non-overlapping, and span the full 24 hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    pub date: Date,
    pub total_miles: f64,
    pub driving_hours: f64,
    pub total_duty_hours: f64,
    pub entries: Vec<LogEntry>,
}

/// One line on a daily log grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub duty_status: DutyStatus,
    /// `"HH:MM"`.
    pub start_time: String,
    /// `"HH:MM"`; the day-closing entry ends at `"24:00"`.
    pub end_time: String,
    pub location: String,
    pub total_hours: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// Round to one decimal place, as the contract's summary figures are shaped.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to two decimal places, used for per-entry hour totals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
