//! Output formatting for CLI display.

use std::fmt::Write;

use crate::model::{DailyLog, TripPlan};

/// Format a full trip plan for human-readable display.
pub(super) fn format_plan(plan: &TripPlan) -> String {
    let mut out = String::new();
    let summary = &plan.route_summary;
    let compliance = &plan.hos_compliance;

    let _ = writeln!(out, "Route");
    let _ = writeln!(out, "  Distance:      {:.1} mi", summary.total_distance_miles);
    let _ = writeln!(out, "  Driving time:  {:.1} h", summary.estimated_driving_time);
    let _ = writeln!(out, "  Duty time:     {:.1} h", summary.total_duty_time);
    let _ = writeln!(out, "  Fuel stops:    {}", summary.fuel_stops_needed);

    let _ = writeln!(out);
    let _ = writeln!(out, "HOS compliance");
    let verdict = if compliance.is_compliant {
        "compliant"
    } else {
        "NOT compliant"
    };
    let _ = writeln!(out, "  Verdict:          {verdict}");
    let _ = writeln!(
        out,
        "  Projected cycle:  {:.1} h",
        compliance.projected_cycle_hours
    );
    if compliance.requires_multi_day {
        let _ = writeln!(out, "  Spans multiple duty days");
    }
    for issue in &compliance.compliance_issues {
        let _ = writeln!(out, "  ! {issue}");
    }

    for log in &plan.daily_logs {
        let _ = writeln!(out);
        let _ = write!(out, "{}", format_daily_log(log));
    }

    out
}

/// Format one daily log: header line plus one line per entry.
pub(super) fn format_daily_log(log: &DailyLog) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}  ({:.1} mi, {:.1} h driving, {:.1} h on duty)",
        log.date, log.total_miles, log.driving_hours, log.total_duty_hours
    );
    for entry in &log.entries {
        let _ = write!(
            out,
            "  {}-{}  {:<21}  {}",
            entry.start_time,
            entry.end_time,
            entry.duty_status.label(),
            entry.location
        );
        if let Some(remarks) = &entry.remarks {
            let _ = write!(out, "  ({remarks})");
        }
        let _ = writeln!(out);
    }
    out
}
