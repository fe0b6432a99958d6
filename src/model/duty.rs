//! Duty-status types: the four FMCSA statuses and timed spans of them.

use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};

/// FMCSA duty status, as recorded on an ELD log grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyStatus {
    OffDuty,
    SleeperBerth,
    Driving,
    OnDutyNotDriving,
}

impl DutyStatus {
    /// Whether time in this status counts against the 14-hour duty day
    /// and the 70-hour cycle.
    pub fn is_on_duty(self) -> bool {
        matches!(self, Self::Driving | Self::OnDutyNotDriving)
    }

    /// Whether a long enough span of this status resets the duty day.
    pub fn is_rest(self) -> bool {
        matches!(self, Self::OffDuty | Self::SleeperBerth)
    }

    /// Display label, matching the printed log grid.
    pub fn label(self) -> &'static str {
        match self {
            Self::OffDuty => "Off Duty",
            Self::SleeperBerth => "Sleeper Berth",
            Self::Driving => "Driving",
            Self::OnDutyNotDriving => "On Duty (Not Driving)",
        }
    }
}

/// One contiguous span of a single duty status on the planned schedule.
///
/// Times are civil (wall-clock) datetimes. A segment never crosses
/// midnight except by ending exactly on it; the daily log builder
/// enforces this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutySegment {
    pub status: DutyStatus,
    pub start: DateTime,
    pub end: DateTime,
    pub location: String,
    pub remarks: Option<String>,
}

impl DutySegment {
    /// Segment length in hours.
    pub fn hours(&self) -> f64 {
        self.start.duration_until(self.end).as_secs_f64() / 3600.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::civil::date;

    #[test]
    fn duty_status_serializes_snake_case() {
        let json = serde_json::to_string(&DutyStatus::OnDutyNotDriving).unwrap();
        assert_eq!(json, "\"on_duty_not_driving\"");
        let json = serde_json::to_string(&DutyStatus::SleeperBerth).unwrap();
        assert_eq!(json, "\"sleeper_berth\"");
    }

    #[test]
    fn segment_hours_from_times() {
        let seg = DutySegment {
            status: DutyStatus::Driving,
            start: date(2025, 3, 10).at(6, 0, 0, 0),
            end: date(2025, 3, 10).at(14, 30, 0, 0),
            location: "En Route".into(),
            remarks: None,
        };
        assert!((seg.hours() - 8.5).abs() < 1e-9);
    }

    #[test]
    fn on_duty_and_rest_classification() {
        assert!(DutyStatus::Driving.is_on_duty());
        assert!(DutyStatus::OnDutyNotDriving.is_on_duty());
        assert!(!DutyStatus::OffDuty.is_on_duty());
        assert!(DutyStatus::SleeperBerth.is_rest());
        assert!(!DutyStatus::Driving.is_rest());
    }
}
