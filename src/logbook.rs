//! Daily log building: partitioning the planned schedule into per-day
//! FMCSA log grids.
//!
//! The builder trusts nothing: gaps, overlaps, midnight-crossing
//! segments, and days that do not sum to 24 hours all fail with
//! [`MalformedSchedule`]. These are planner defects, not user input.

use jiff::civil::{Date, DateTime, Time};

use crate::clock::EPSILON;
use crate::model::{DailyLog, DutySegment, DutyStatus, LogEntry, RouteGeometry, round1, round2};

/// A structural defect in the planned segments.
///
/// Fatal for the request; surfaced as an internal error, never as a
/// compliance issue.
#[derive(Debug, thiserror::Error)]
#[error("malformed schedule: {0}")]
pub struct MalformedSchedule(String);

impl MalformedSchedule {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Partition planned segments into calendar-day logs.
///
/// Per-day mileage is the trip total prorated by that day's share of the
/// trip's driving hours.
pub fn build(
    segments: &[DutySegment],
    geometry: &RouteGeometry,
) -> Result<Vec<DailyLog>, MalformedSchedule> {
    if segments.is_empty() {
        return Err(MalformedSchedule::new("no segments planned"));
    }

    let days = partition(segments)?;

    let trip_driving: f64 = segments
        .iter()
        .filter(|s| s.status == DutyStatus::Driving)
        .map(DutySegment::hours)
        .sum();

    let mut logs = Vec::with_capacity(days.len());
    for (date, day_segments) in days {
        validate_day(date, &day_segments)?;

        let driving: f64 = day_segments
            .iter()
            .filter(|s| s.status == DutyStatus::Driving)
            .map(|s| s.hours())
            .sum();
        let duty: f64 = day_segments
            .iter()
            .filter(|s| s.status.is_on_duty())
            .map(|s| s.hours())
            .sum();
        let miles = if trip_driving > EPSILON {
            geometry.total_distance_miles * driving / trip_driving
        } else {
            0.0
        };

        logs.push(DailyLog {
            date,
            total_miles: round1(miles),
            driving_hours: round2(driving),
            total_duty_hours: round2(duty),
            entries: day_segments.iter().map(|s| to_entry(s)).collect(),
        });
    }
    Ok(logs)
}

/// Group segments by start date, preserving order and requiring the
/// dates themselves to be consecutive.
fn partition(
    segments: &[DutySegment],
) -> Result<Vec<(Date, Vec<&DutySegment>)>, MalformedSchedule> {
    let mut days: Vec<(Date, Vec<&DutySegment>)> = Vec::new();
    for segment in segments {
        if segment.hours() <= EPSILON {
            return Err(MalformedSchedule::new(format!(
                "zero-length segment at {}",
                segment.start
            )));
        }
        let date = segment.start.date();
        if segment.end.date() != date && segment.end.time() != Time::midnight() {
            return Err(MalformedSchedule::new(format!(
                "segment crosses midnight: {} to {}",
                segment.start, segment.end
            )));
        }
        let start_new_day = match days.last() {
            None => true,
            Some((day, _)) if *day == date => false,
            Some((day, _)) => {
                if day.tomorrow().ok() != Some(date) {
                    return Err(MalformedSchedule::new(format!(
                        "log days are not consecutive: {day} then {date}"
                    )));
                }
                true
            }
        };
        if start_new_day {
            days.push((date, Vec::new()));
        }
        if let Some((_, list)) = days.last_mut() {
            list.push(segment);
        }
    }
    Ok(days)
}

/// One day's entries must run midnight to midnight with no gaps or
/// overlaps, totalling exactly 24 hours.
fn validate_day(date: Date, day_segments: &[&DutySegment]) -> Result<(), MalformedSchedule> {
    let first = day_segments[0];
    if first.start.time() != Time::midnight() {
        return Err(MalformedSchedule::new(format!(
            "day {date} does not start at midnight"
        )));
    }

    let mut prev_end: Option<DateTime> = None;
    for segment in day_segments {
        if let Some(prev) = prev_end
            && segment.start != prev
        {
            return Err(MalformedSchedule::new(format!(
                "gap or overlap on {date} at {}",
                segment.start
            )));
        }
        prev_end = Some(segment.end);
    }

    let last = day_segments[day_segments.len() - 1];
    if last.end.time() != Time::midnight() || last.end.date() == date {
        return Err(MalformedSchedule::new(format!(
            "day {date} does not end at midnight"
        )));
    }

    let total: f64 = day_segments.iter().map(|s| s.hours()).sum();
    if (total - 24.0).abs() > EPSILON {
        return Err(MalformedSchedule::new(format!(
            "day {date} spans {total}h, expected 24h"
        )));
    }
    Ok(())
}

fn to_entry(segment: &DutySegment) -> LogEntry {
    let closes_day =
        segment.end.time() == Time::midnight() && segment.end.date() != segment.start.date();
    LogEntry {
        duty_status: segment.status,
        start_time: format_time(segment.start),
        end_time: if closes_day {
            "24:00".to_string()
        } else {
            format_time(segment.end)
        },
        location: segment.location.clone(),
        total_hours: round2(segment.hours()),
        remarks: segment.remarks.clone(),
    }
}

fn format_time(at: DateTime) -> String {
    format!("{:02}:{:02}", at.time().hour(), at.time().minute())
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::SignedDuration;
    use jiff::civil::date;

    use crate::clock::HosRules;
    use crate::model::{TripRequest, Waypoint};
    use crate::plan::plan_segments;

    fn geometry(miles: f64, hours: f64) -> RouteGeometry {
        RouteGeometry {
            waypoints: vec![Waypoint {
                lat: 41.8781,
                lng: -87.6298,
            }],
            instructions: vec![],
            total_distance_miles: miles,
            estimated_driving_time: hours,
        }
    }

    fn planned(miles: f64, hours: f64, cycle: f64) -> (Vec<DutySegment>, RouteGeometry) {
        let request = TripRequest {
            current_location: "Chicago, IL".into(),
            pickup_location: "Denver, CO".into(),
            dropoff_location: "Los Angeles, CA".into(),
            current_cycle_hours: cycle,
        };
        let geometry = geometry(miles, hours);
        let segments = plan_segments(
            &HosRules::fmcsa(),
            &request,
            &geometry,
            date(2025, 6, 2),
        )
        .unwrap();
        (segments, geometry)
    }

    fn segment(status: DutyStatus, start: DateTime, hours: i64) -> DutySegment {
        DutySegment {
            status,
            start,
            end: start
                .checked_add(SignedDuration::from_secs(hours * 3600))
                .unwrap(),
            location: "Test".into(),
            remarks: None,
        }
    }

    #[test]
    fn every_day_sums_to_twenty_four_hours() {
        let (segments, geometry) = planned(1500.0, 25.0, 0.0);
        let logs = build(&segments, &geometry).unwrap();
        assert!(logs.len() > 1);
        for log in &logs {
            let total: f64 = log.entries.iter().map(|e| e.total_hours).sum();
            assert!((total - 24.0).abs() < 0.05, "{}: {total}h", log.date);
        }
    }

    #[test]
    fn entries_are_contiguous_and_close_at_midnight() {
        let (segments, geometry) = planned(500.0, 8.0, 0.0);
        let logs = build(&segments, &geometry).unwrap();
        let log = &logs[0];
        assert_eq!(log.entries[0].start_time, "00:00");
        for pair in log.entries.windows(2) {
            assert_eq!(pair[0].end_time, pair[1].start_time);
        }
        assert_eq!(log.entries.last().unwrap().end_time, "24:00");
    }

    #[test]
    fn mileage_prorates_by_driving_share() {
        let (segments, geometry) = planned(1200.0, 20.0, 0.0);
        let logs = build(&segments, &geometry).unwrap();
        let total: f64 = logs.iter().map(|l| l.total_miles).sum();
        assert!((total - 1200.0).abs() < 0.5);
        // Day one carries 11 of 20 driving hours.
        assert!((logs[0].total_miles - 660.0).abs() < 0.5);
        assert!((logs[0].driving_hours - 11.0).abs() < 0.01);
    }

    #[test]
    fn zero_driving_trip_logs_zero_miles() {
        let (segments, geometry) = planned(0.0, 0.0, 0.0);
        let logs = build(&segments, &geometry).unwrap();
        assert_eq!(logs.len(), 1);
        assert!(logs[0].total_miles.abs() < f64::EPSILON);
    }

    #[test]
    fn empty_schedule_is_malformed() {
        let err = build(&[], &geometry(100.0, 2.0)).unwrap_err();
        assert!(err.to_string().contains("no segments"));
    }

    #[test]
    fn gap_is_detected() {
        let day = date(2025, 6, 2);
        let segments = vec![
            segment(DutyStatus::OffDuty, day.at(0, 0, 0, 0), 6),
            // Gap: next starts at 07:00 instead of 06:00.
            segment(DutyStatus::Driving, day.at(7, 0, 0, 0), 17),
        ];
        let err = build(&segments, &geometry(100.0, 2.0)).unwrap_err();
        assert!(err.to_string().contains("gap or overlap"));
    }

    #[test]
    fn midnight_crossing_segment_is_detected() {
        let day = date(2025, 6, 2);
        let segments = vec![
            segment(DutyStatus::OffDuty, day.at(0, 0, 0, 0), 20),
            segment(DutyStatus::Driving, day.at(20, 0, 0, 0), 6),
        ];
        let err = build(&segments, &geometry(100.0, 2.0)).unwrap_err();
        assert!(err.to_string().contains("crosses midnight"));
    }

    #[test]
    fn short_day_is_detected() {
        let day = date(2025, 6, 2);
        let segments = vec![segment(DutyStatus::OffDuty, day.at(0, 0, 0, 0), 23)];
        let err = build(&segments, &geometry(100.0, 2.0)).unwrap_err();
        assert!(err.to_string().contains("does not end at midnight"));
    }

    #[test]
    fn day_not_opening_at_midnight_is_detected() {
        let day = date(2025, 6, 2);
        let segments = vec![segment(DutyStatus::OffDuty, day.at(1, 0, 0, 0), 23)];
        let err = build(&segments, &geometry(100.0, 2.0)).unwrap_err();
        assert!(err.to_string().contains("does not start at midnight"));
    }

    #[test]
    fn day_end_serializes_as_twenty_four_hundred() {
        let day = date(2025, 6, 2);
        let entry = to_entry(&segment(DutyStatus::OffDuty, day.at(18, 0, 0, 0), 6));
        assert_eq!(entry.start_time, "18:00");
        assert_eq!(entry.end_time, "24:00");
        assert!((entry.total_hours - 6.0).abs() < f64::EPSILON);
    }
}
