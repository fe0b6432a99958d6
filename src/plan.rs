//! Segment planning: turning a route into an HOS-legal duty schedule.
//!
//! The planner walks the trip forward on a civil-time cursor, consulting
//! the duty clock before committing each block. Daily limits are recovered
//! by closing the day and opening the next with a 10-hour rest. The
//! 70-hour cycle is advisory during planning — a rest cannot cure it under
//! the monotone cycle model — and is reported by the evaluator instead.
//!
//! Planned segments cover every calendar day they touch from midnight to
//! midnight, so the daily log builder only partitions and validates.

use jiff::SignedDuration;
use jiff::civil::{Date, DateTime};

use crate::clock::{self, CycleState, EPSILON, HosRules, Limit};
use crate::comply;
use crate::logbook::{self, MalformedSchedule};
use crate::model::{
    DutySegment, DutyStatus, RouteData, RouteGeometry, RouteSummary, TripPlan, TripRequest,
    Waypoint, round1,
};
use crate::route::RouteError;

/// Duty begins at 06:00 on day one; midnight to 06:00 is off-duty.
const DAY_START_HOURS: f64 = 6.0;

/// Errors a trip computation can surface to the caller.
///
/// `LimitExceeded` signals from the duty clock never appear here: the
/// planner recovers from them and the evaluator reports the rest as
/// compliance issues in the output.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// Malformed or out-of-range request fields. No computation attempted.
    #[error("invalid trip request: {0}")]
    Validation(String),

    /// The routing provider failed. Retryable; no partial result.
    #[error(transparent)]
    Route(#[from] RouteError),

    /// The planned segments violated a structural invariant. A planner
    /// defect, not user input or a compliance finding.
    #[error(transparent)]
    Schedule(#[from] MalformedSchedule),
}

/// Compute a complete trip plan: validate, plan segments, evaluate
/// compliance, and build the daily logs.
///
/// Deterministic: identical request, geometry, and start date produce
/// identical output.
pub fn plan_trip(
    rules: &HosRules,
    request: &TripRequest,
    geometry: &RouteGeometry,
    start_date: Date,
) -> Result<TripPlan, PlanError> {
    request.validate().map_err(PlanError::Validation)?;

    let segments = plan_segments(rules, request, geometry, start_date)?;
    let hos_compliance = comply::evaluate(rules, request, &segments);
    let daily_logs = logbook::build(&segments, geometry)?;

    let total_duty_time: f64 = segments
        .iter()
        .filter(|s| s.status.is_on_duty())
        .map(DutySegment::hours)
        .sum();

    Ok(TripPlan {
        route_summary: RouteSummary {
            total_distance_miles: round1(geometry.total_distance_miles),
            estimated_driving_time: round1(geometry.estimated_driving_time),
            total_duty_time: round1(total_duty_time),
            fuel_stops_needed: fuel_stops_needed(rules, geometry.total_distance_miles),
        },
        route_data: RouteData {
            instructions: geometry.instructions.clone(),
            waypoints: geometry
                .waypoints
                .iter()
                .copied()
                .map(Waypoint::to_contract)
                .collect(),
        },
        hos_compliance,
        daily_logs,
    })
}

/// Fuel stops for the trip: one per full fuel interval, none for the
/// final partial interval.
pub fn fuel_stops_needed(rules: &HosRules, miles: f64) -> u32 {
    let intervals = (miles / rules.fuel_interval_miles).ceil() as i64 - 1;
    intervals.max(0) as u32
}

/// Plan the full duty-status schedule for one trip.
pub fn plan_segments(
    rules: &HosRules,
    request: &TripRequest,
    geometry: &RouteGeometry,
    start_date: Date,
) -> Result<Vec<DutySegment>, PlanError> {
    let mut planner = Planner {
        rules,
        state: CycleState::seeded(request.current_cycle_hours),
        segments: Vec::new(),
        cursor: start_date.at(0, 0, 0, 0),
    };

    // The duty day opens at 06:00; everything before is off duty.
    planner.push(
        DutyStatus::OffDuty,
        DAY_START_HOURS,
        &request.current_location,
        Some("Off duty"),
    )?;

    planner.on_duty_block(
        rules.pickup_dropoff_hours,
        &request.pickup_location,
        "Loading and pickup",
    )?;

    planner.drive(geometry)?;

    planner.on_duty_block(
        rules.pickup_dropoff_hours,
        &request.dropoff_location,
        "Unloading and delivery",
    )?;

    // Pad the final day to midnight.
    let pad = hours_to_midnight(planner.cursor);
    if pad > EPSILON {
        planner.push(
            DutyStatus::OffDuty,
            pad,
            &request.dropoff_location,
            Some("End of duty"),
        )?;
    }

    Ok(planner.segments)
}

/// Schedule under construction: the cursor, the clock state, and the
/// segments committed so far.
struct Planner<'a> {
    rules: &'a HosRules,
    state: CycleState,
    segments: Vec<DutySegment>,
    cursor: DateTime,
}

impl Planner<'_> {
    /// Emit one segment and run it through the clock.
    ///
    /// Zero-length requests are dropped; consecutive driving merges into
    /// one segment. A daily-limit rejection here is a planner math bug —
    /// callers reserve room before pushing — and fails the request.
    fn push(
        &mut self,
        status: DutyStatus,
        hours: f64,
        location: &str,
        remarks: Option<&str>,
    ) -> Result<(), PlanError> {
        if hours <= EPSILON {
            return Ok(());
        }
        let start = self.cursor;
        let end = add_hours(start, hours);
        // Commit the second-rounded span so the clock and the grid agree.
        let span = start.duration_until(end).as_secs_f64() / 3600.0;

        self.state = match clock::advance(self.rules, &self.state, status, span) {
            Ok(next) => next,
            // The cycle ceiling is advisory while planning.
            Err(e) if e.limit == Limit::Cycle => clock::apply(self.rules, &self.state, status, span),
            Err(e) => {
                return Err(MalformedSchedule::new(format!(
                    "planner committed past a daily limit at {start}: {e}"
                ))
                .into());
            }
        };

        if status == DutyStatus::Driving
            && let Some(last) = self.segments.last_mut()
            && last.status == DutyStatus::Driving
            && last.end == start
        {
            last.end = end;
        } else {
            self.segments.push(DutySegment {
                status,
                start,
                end,
                location: location.to_string(),
                remarks: remarks.map(str::to_string),
            });
        }
        self.cursor = end;
        Ok(())
    }

    /// An on-duty block (pickup, dropoff, fuel stop), closing the day
    /// first when the 14-hour window cannot fit it.
    fn on_duty_block(&mut self, hours: f64, location: &str, remarks: &str) -> Result<(), PlanError> {
        if self.state.duty_today + hours > self.rules.max_duty_day + EPSILON {
            self.close_day()?;
        }
        self.push(DutyStatus::OnDutyNotDriving, hours, location, Some(remarks))
    }

    /// Close the open day: off-duty padding to midnight, then the
    /// 10-hour rest that opens the next day. The rest resets the day
    /// counters through the clock; the two are never merged.
    fn close_day(&mut self) -> Result<(), PlanError> {
        let pad = hours_to_midnight(self.cursor);
        if pad > EPSILON {
            self.push(
                DutyStatus::OffDuty,
                pad,
                "Rest Stop",
                Some("End of duty day"),
            )?;
        }
        self.push(
            DutyStatus::OffDuty,
            self.rules.daily_rest,
            "Rest Stop",
            Some("Required 10-hour rest"),
        )
    }

    /// The driving loop: chunks of driving bounded by the 30-minute-break
    /// rule, the daily limits, the fuel interval, and the remaining time.
    fn drive(&mut self, geometry: &RouteGeometry) -> Result<(), PlanError> {
        let rules = self.rules;
        let total_drive = geometry.estimated_driving_time;
        let mph = if total_drive > EPSILON {
            geometry.total_distance_miles / total_drive
        } else {
            0.0
        };
        let fuel_interval_hours = if mph > EPSILON {
            rules.fuel_interval_miles / mph
        } else {
            f64::INFINITY
        };

        let mut driven = 0.0;
        let mut next_fuel = fuel_interval_hours;
        while total_drive - driven > EPSILON {
            // Mandatory break once 8 driving hours accumulate. Inserted
            // before any day boundary; when the duty window cannot fit
            // even the break, the 10-hour rest discharges it instead.
            if self.state.driving_since_break + EPSILON >= rules.break_after_driving {
                if self.state.duty_today + rules.break_duration <= rules.max_duty_day + EPSILON {
                    self.push(
                        DutyStatus::OnDutyNotDriving,
                        rules.break_duration,
                        "Rest Area",
                        Some("Required 30-minute break"),
                    )?;
                } else {
                    self.close_day()?;
                }
                continue;
            }

            let drive_room = (rules.max_driving_day - self.state.driving_today)
                .min(rules.max_duty_day - self.state.duty_today);
            if drive_room <= EPSILON {
                self.close_day()?;
                continue;
            }

            let until_break = rules.break_after_driving - self.state.driving_since_break;
            let chunk = (total_drive - driven)
                .min(drive_room)
                .min(until_break)
                .min(next_fuel - driven);
            self.push(DutyStatus::Driving, chunk, "En Route", Some("Driving"))?;
            driven += chunk;

            if driven + EPSILON >= next_fuel && total_drive - driven > EPSILON {
                self.on_duty_block(rules.fuel_stop_duration, "Fuel Stop", "Fueling")?;
                next_fuel += fuel_interval_hours;
            }
        }
        Ok(())
    }
}

/// Move a civil datetime forward by fractional hours, rounded to seconds.
fn add_hours(at: DateTime, hours: f64) -> DateTime {
    let secs = (hours * 3600.0).round() as i64;
    at.checked_add(SignedDuration::from_secs(secs))
        .expect("civil datetime out of range")
}

/// Hours remaining between `at` and the following midnight.
fn hours_to_midnight(at: DateTime) -> f64 {
    let midnight = at
        .date()
        .tomorrow()
        .expect("civil date out of range")
        .at(0, 0, 0, 0);
    at.duration_until(midnight).as_secs_f64() / 3600.0
}
