//! The duty clock: pure accounting of driving, duty, and cycle hours
//! against the FMCSA limits.
//!
//! The clock never decides anything about the schedule. It answers one
//! question — may this much time in this status be committed? — and
//! leaves recovery (breaks, day boundaries, rests) to the planner.

use std::fmt;

use crate::model::DutyStatus;

/// Tolerance for hour arithmetic on `f64` totals.
pub const EPSILON: f64 = 1e-6;

/// The regulatory constants the engine enforces.
///
/// A single injected structure rather than scattered literals; the
/// boundary contract fixes the FMCSA values, but tests and future rule
/// sets can construct alternates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HosRules {
    /// Maximum driving hours in one duty day.
    pub max_driving_day: f64,
    /// Maximum on-duty hours in one duty day.
    pub max_duty_day: f64,
    /// Cumulative driving hours after which a 30-minute break is required.
    pub break_after_driving: f64,
    /// Minimum qualifying break length, in hours.
    pub break_duration: f64,
    /// Consecutive off-duty hours that reset the duty day.
    pub daily_rest: f64,
    /// Maximum on-duty hours in the rolling 8-day cycle.
    pub max_cycle: f64,
    /// Fixed on-duty block for pickup and for dropoff, each.
    pub pickup_dropoff_hours: f64,
    /// Miles of driving between fuel stops.
    pub fuel_interval_miles: f64,
    /// On-duty time per fuel stop, in hours.
    pub fuel_stop_duration: f64,
}

impl HosRules {
    /// The FMCSA property-carrying rule set fixed by the boundary contract.
    pub const fn fmcsa() -> Self {
        Self {
            max_driving_day: 11.0,
            max_duty_day: 14.0,
            break_after_driving: 8.0,
            break_duration: 0.5,
            daily_rest: 10.0,
            max_cycle: 70.0,
            pickup_dropoff_hours: 1.0,
            fuel_interval_miles: 1000.0,
            fuel_stop_duration: 0.5,
        }
    }
}

impl Default for HosRules {
    fn default() -> Self {
        Self::fmcsa()
    }
}

/// Rolling totals the clock maintains as segments are consumed.
///
/// Daily counters reset when a qualifying rest is consumed; the cycle
/// counter only ever grows within one plan.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CycleState {
    pub driving_today: f64,
    pub duty_today: f64,
    pub cycle_hours: f64,
    /// Driving hours since the last qualifying (≥ 30 min non-driving) break.
    pub driving_since_break: f64,
}

impl CycleState {
    /// Seed a fresh state from hours already used in the 8-day window.
    pub fn seeded(cycle_hours: f64) -> Self {
        Self {
            cycle_hours,
            ..Self::default()
        }
    }
}

/// Which ceiling an advance would cross.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Driving,
    Duty,
    Cycle,
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Driving => write!(f, "driving"),
            Self::Duty => write!(f, "duty"),
            Self::Cycle => write!(f, "cycle"),
        }
    }
}

/// Signal that committing a segment would cross a regulatory ceiling.
///
/// This is a value the planner recovers from locally, never an error
/// surfaced to the caller.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("{limit} limit: {attempted:.2}h against a {ceiling:.2}h ceiling")]
pub struct LimitExceeded {
    pub limit: Limit,
    /// The total the counter would have reached.
    pub attempted: f64,
    /// The ceiling that would have been crossed.
    pub ceiling: f64,
}

/// Project `hours` of `status` onto `state`, refusing to cross a ceiling.
///
/// Pure: returns the successor state, mutates nothing.
pub fn advance(
    rules: &HosRules,
    state: &CycleState,
    status: DutyStatus,
    hours: f64,
) -> Result<CycleState, LimitExceeded> {
    if status == DutyStatus::Driving {
        let driving = state.driving_today + hours;
        if driving > rules.max_driving_day + EPSILON {
            return Err(LimitExceeded {
                limit: Limit::Driving,
                attempted: driving,
                ceiling: rules.max_driving_day,
            });
        }
    }
    if status.is_on_duty() {
        let duty = state.duty_today + hours;
        if duty > rules.max_duty_day + EPSILON {
            return Err(LimitExceeded {
                limit: Limit::Duty,
                attempted: duty,
                ceiling: rules.max_duty_day,
            });
        }
        let cycle = state.cycle_hours + hours;
        if cycle > rules.max_cycle + EPSILON {
            return Err(LimitExceeded {
                limit: Limit::Cycle,
                attempted: cycle,
                ceiling: rules.max_cycle,
            });
        }
    }
    Ok(apply(rules, state, status, hours))
}

/// The same accounting as [`advance`] without the ceiling checks.
///
/// Used where crossing is deliberate: the planner treats the 70-hour
/// cycle as advisory, and the evaluator keeps replaying after recording
/// a violation.
pub fn apply(rules: &HosRules, state: &CycleState, status: DutyStatus, hours: f64) -> CycleState {
    let mut next = *state;
    match status {
        DutyStatus::Driving => {
            next.driving_today += hours;
            next.duty_today += hours;
            next.cycle_hours += hours;
            next.driving_since_break += hours;
        }
        DutyStatus::OnDutyNotDriving => {
            next.duty_today += hours;
            next.cycle_hours += hours;
            if hours + EPSILON >= rules.break_duration {
                next.driving_since_break = 0.0;
            }
        }
        DutyStatus::OffDuty | DutyStatus::SleeperBerth => {
            if hours + EPSILON >= rules.daily_rest {
                next.driving_today = 0.0;
                next.duty_today = 0.0;
                next.driving_since_break = 0.0;
            } else if hours + EPSILON >= rules.break_duration {
                next.driving_since_break = 0.0;
            }
        }
    }
    next
}
