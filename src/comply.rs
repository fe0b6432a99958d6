//! Compliance evaluation: an independent replay of the planned schedule
//! through the duty clock.
//!
//! The planner already mitigates limits while building the schedule; this
//! pass verifies the result from scratch, catching planner defects and
//! inputs that were violated before planning began. Findings are output
//! data, never errors.

use jiff::civil::Date;

use crate::clock::{self, CycleState, EPSILON, HosRules, Limit};
use crate::model::{ComplianceResult, DutySegment, TripRequest, round1};

/// Replay the duty clock over `segments` and derive the compliance verdict.
pub fn evaluate(
    rules: &HosRules,
    request: &TripRequest,
    segments: &[DutySegment],
) -> ComplianceResult {
    let planned_on_duty: f64 = segments
        .iter()
        .filter(|s| s.status.is_on_duty())
        .map(DutySegment::hours)
        .sum();
    let projected = request.current_cycle_hours + planned_on_duty;

    let mut issues = Vec::new();
    let mut state = CycleState::seeded(request.current_cycle_hours);
    // Each daily limit is reported once per calendar day, the cycle once
    // per trip; every later segment would otherwise repeat the finding.
    let mut driving_flagged: Option<Date> = None;
    let mut duty_flagged: Option<Date> = None;
    let mut cycle_crossed = false;

    for segment in segments {
        let hours = segment.hours();
        state = match clock::advance(rules, &state, segment.status, hours) {
            Ok(next) => next,
            Err(exceeded) => {
                let day = segment.start.date();
                match exceeded.limit {
                    Limit::Driving => {
                        if driving_flagged != Some(day) {
                            issues.push(format!(
                                "Driving time on {day} ({:.1}h) exceeds the {:.0}-hour limit",
                                exceeded.attempted, exceeded.ceiling
                            ));
                            driving_flagged = Some(day);
                        }
                    }
                    Limit::Duty => {
                        if duty_flagged != Some(day) {
                            issues.push(format!(
                                "On-duty time on {day} ({:.1}h) exceeds the {:.0}-hour limit",
                                exceeded.attempted, exceeded.ceiling
                            ));
                            duty_flagged = Some(day);
                        }
                    }
                    Limit::Cycle => cycle_crossed = true,
                }
                clock::apply(rules, &state, segment.status, hours)
            }
        };
    }

    if cycle_crossed || projected > rules.max_cycle + EPSILON {
        issues.push(format!(
            "Would exceed the {:.0}-hour/8-day cycle limit ({:.1}h projected)",
            rules.max_cycle,
            round1(projected)
        ));
    }

    let requires_multi_day = match (segments.first(), segments.last()) {
        (Some(first), Some(last)) => first.start.date() != last.start.date(),
        _ => false,
    };

    ComplianceResult {
        is_compliant: issues.is_empty() && projected <= rules.max_cycle + EPSILON,
        compliance_issues: issues,
        requires_multi_day,
        projected_cycle_hours: round1(projected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::civil::{DateTime, date};

    use crate::model::DutyStatus;

    fn rules() -> HosRules {
        HosRules::fmcsa()
    }

    fn request(cycle_hours: f64) -> TripRequest {
        TripRequest {
            current_location: "Dallas, TX".into(),
            pickup_location: "Houston, TX".into(),
            dropoff_location: "San Antonio, TX".into(),
            current_cycle_hours: cycle_hours,
        }
    }

    fn segment(status: DutyStatus, start: DateTime, hours: i64) -> DutySegment {
        DutySegment {
            status,
            start,
            end: start
                .checked_add(jiff::SignedDuration::from_secs(hours * 3600))
                .unwrap(),
            location: "Test".into(),
            remarks: None,
        }
    }

    /// A clean single day: off 6h, on-duty 1h, driving 8h, on-duty 1h, off 8h.
    fn clean_day() -> Vec<DutySegment> {
        let day = date(2025, 6, 2);
        vec![
            segment(DutyStatus::OffDuty, day.at(0, 0, 0, 0), 6),
            segment(DutyStatus::OnDutyNotDriving, day.at(6, 0, 0, 0), 1),
            segment(DutyStatus::Driving, day.at(7, 0, 0, 0), 8),
            segment(DutyStatus::OnDutyNotDriving, day.at(15, 0, 0, 0), 1),
            segment(DutyStatus::OffDuty, day.at(16, 0, 0, 0), 8),
        ]
    }

    #[test]
    fn clean_schedule_is_compliant() {
        let result = evaluate(&rules(), &request(0.0), &clean_day());
        assert!(result.is_compliant);
        assert!(result.compliance_issues.is_empty());
        assert!(!result.requires_multi_day);
        assert!((result.projected_cycle_hours - 10.0).abs() < EPSILON);
    }

    #[test]
    fn projection_is_exact_over_planned_hours() {
        let result = evaluate(&rules(), &request(12.5), &clean_day());
        // 12.5 + 1 + 8 + 1 on-duty hours.
        assert!((result.projected_cycle_hours - 22.5).abs() < EPSILON);
    }

    #[test]
    fn overdriven_day_is_flagged_once() {
        let day = date(2025, 6, 2);
        // 12 hours of driving split in two, no qualifying break between:
        // both the 11-hour and (with the pickup hour) no duty overrun.
        let segments = vec![
            segment(DutyStatus::OffDuty, day.at(0, 0, 0, 0), 6),
            segment(DutyStatus::Driving, day.at(6, 0, 0, 0), 8),
            segment(DutyStatus::Driving, day.at(14, 0, 0, 0), 4),
            segment(DutyStatus::OffDuty, day.at(18, 0, 0, 0), 6),
        ];
        let result = evaluate(&rules(), &request(0.0), &segments);
        assert!(!result.is_compliant);
        let driving_issues: Vec<&String> = result
            .compliance_issues
            .iter()
            .filter(|i| i.contains("Driving time"))
            .collect();
        assert_eq!(driving_issues.len(), 1);
        assert!(driving_issues[0].contains("11-hour"));
    }

    #[test]
    fn duty_overrun_is_flagged() {
        let day = date(2025, 6, 2);
        let segments = vec![
            segment(DutyStatus::OnDutyNotDriving, day.at(0, 0, 0, 0), 15),
            segment(DutyStatus::OffDuty, day.at(15, 0, 0, 0), 9),
        ];
        let result = evaluate(&rules(), &request(0.0), &segments);
        assert!(
            result
                .compliance_issues
                .iter()
                .any(|i| i.contains("14-hour"))
        );
    }

    #[test]
    fn pre_violated_cycle_is_flagged() {
        let result = evaluate(&rules(), &request(65.0), &clean_day());
        assert!(!result.is_compliant);
        assert_eq!(result.compliance_issues.len(), 1);
        assert!(result.compliance_issues[0].contains("70-hour"));
        assert!(result.compliance_issues[0].contains("75.0h"));
    }

    #[test]
    fn cycle_flagged_once_across_many_segments() {
        let mut segments = clean_day();
        let day2 = date(2025, 6, 3);
        segments.extend([
            segment(DutyStatus::OffDuty, day2.at(0, 0, 0, 0), 10),
            segment(DutyStatus::Driving, day2.at(10, 0, 0, 0), 8),
            segment(DutyStatus::OffDuty, day2.at(18, 0, 0, 0), 6),
        ]);
        let result = evaluate(&rules(), &request(60.0), &segments);
        let cycle_issues = result
            .compliance_issues
            .iter()
            .filter(|i| i.contains("70-hour"))
            .count();
        assert_eq!(cycle_issues, 1);
        assert!(result.requires_multi_day);
    }

    #[test]
    fn multi_day_detection_from_dates() {
        let result = evaluate(&rules(), &request(0.0), &clean_day());
        assert!(!result.requires_multi_day);

        let mut segments = clean_day();
        segments.push(segment(
            DutyStatus::OffDuty,
            date(2025, 6, 3).at(0, 0, 0, 0),
            10,
        ));
        let result = evaluate(&rules(), &request(0.0), &segments);
        assert!(result.requires_multi_day);
    }

    #[test]
    fn empty_schedule_is_vacuously_compliant() {
        let result = evaluate(&rules(), &request(0.0), &[]);
        assert!(result.is_compliant);
        assert!(!result.requires_multi_day);
        assert!(result.projected_cycle_hours.abs() < EPSILON);
    }
}
