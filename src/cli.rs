//! CLI interface for Roadlog.
//!
//! Each subcommand is non-interactive: arguments in, structured output out.
//!
//! Commands split into two groups:
//!
//! - `roadlog plan` — compute an HOS-compliant schedule for a trip and save it.
//! - `roadlog trip list|show` — revisit saved trips.

mod format;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use jiff::{Timestamp, Zoned, civil::Date};
use uuid::Uuid;

use crate::clock::HosRules;
use crate::config::Config;
use crate::model::{Trip, TripRequest};
use crate::plan::plan_trip;
use crate::route::{CityAtlas, RouteProvider, load_route_file};
use crate::storage::{Storage, TripSummary};

use format::format_plan;

/// Roadlog — HOS-compliant trip planning for property-carrying drivers.
#[derive(Debug, Parser)]
#[command(name = "roadlog", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r#"Workflow: planning a trip
  1. roadlog plan "Atlanta, GA" "Charlotte, NC" "Jacksonville, FL" --cycle-hours 12.5
     → prints the schedule and a trip ID (e.g. a3b0fc12)
  2. roadlog trip list
  3. roadlog trip show a3b

Use --json on plan and show for the full machine-readable plan.
Use --route-file to supply route geometry from a file instead of the
built-in city table."#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Plan a trip: route it, schedule duty segments under the HOS rules,
    /// and save the result. Prints the trip ID to stderr.
    Plan {
        /// Where the driver currently is.
        current_location: String,

        /// Pickup location (1 hour on duty).
        pickup_location: String,

        /// Dropoff location (1 hour on duty).
        dropoff_location: String,

        /// Hours already used in the current 70-hour/8-day cycle.
        #[arg(long, default_value_t = 0.0)]
        cycle_hours: f64,

        /// Calendar date the trip starts on (defaults to today).
        #[arg(long)]
        date: Option<Date>,

        /// JSON file with route geometry, bypassing the built-in city table.
        #[arg(long)]
        route_file: Option<PathBuf>,

        /// Print the full plan as JSON instead of the readable summary.
        #[arg(long)]
        json: bool,
    },

    /// Revisit saved trips.
    Trip {
        #[command(subcommand)]
        command: TripCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum TripCommand {
    /// List saved trips.
    List,

    /// Show a saved trip's plan.
    Show {
        /// Trip ID: full UUID or unambiguous prefix (e.g. `a3b`).
        id: String,

        /// Print the full plan as JSON instead of the readable summary.
        #[arg(long)]
        json: bool,
    },
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config, storage: &Storage) -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::Plan {
            current_location,
            pickup_location,
            dropoff_location,
            cycle_hours,
            date,
            route_file,
            json,
        } => {
            let request = TripRequest {
                current_location,
                pickup_location,
                dropoff_location,
                current_cycle_hours: cycle_hours,
            };
            cmd_plan(config, storage, &request, date, route_file.as_deref(), json)
        }
        Command::Trip { command } => match command {
            TripCommand::List => cmd_list(storage),
            TripCommand::Show { id, json } => cmd_show(storage, &id, json),
        },
    }
}

fn cmd_plan(
    config: &Config,
    storage: &Storage,
    request: &TripRequest,
    date: Option<Date>,
    route_file: Option<&std::path::Path>,
    json: bool,
) -> Result<(), String> {
    request.validate()?;

    let geometry = match route_file {
        Some(path) => load_route_file(path)
            .map_err(|e| format!("failed to load route from {}: {e}", path.display()))?,
        None => {
            let atlas = CityAtlas::new(config.average_speed_mph, config.road_factor);
            atlas
                .route(
                    &request.current_location,
                    &request.pickup_location,
                    &request.dropoff_location,
                )
                .map_err(|e| format!("routing failed: {e}"))?
        }
    };

    let start_date = date.unwrap_or_else(|| Zoned::now().date());
    let plan = plan_trip(&HosRules::fmcsa(), request, &geometry, start_date)
        .map_err(|e| format!("planning failed: {e}"))?;

    let trip = Trip {
        id: Uuid::new_v4(),
        created_at: Timestamp::now(),
        request: request.clone(),
        plan,
    };

    storage
        .create_trip(&trip)
        .map_err(|e| format!("failed to save trip: {e}"))?;

    if json {
        let text = serde_json::to_string_pretty(&trip.plan)
            .map_err(|e| format!("failed to serialize plan: {e}"))?;
        println!("{text}");
    } else {
        print!("{}", format_plan(&trip.plan));
    }

    let short_id = &trip.id.to_string()[..8];
    eprintln!("Saved trip {short_id}");
    Ok(())
}

fn cmd_list(storage: &Storage) -> Result<(), String> {
    let trips = storage
        .list_trips()
        .map_err(|e| format!("failed to list trips: {e}"))?;

    if trips.is_empty() {
        println!("No trips");
        return Ok(());
    }

    for t in &trips {
        let verdict = if t.is_compliant {
            "compliant"
        } else {
            "not compliant"
        };
        let days = if t.requires_multi_day {
            "multi-day"
        } else {
            "single-day"
        };
        let short_id = &t.id.to_string()[..8];
        println!(
            "{short_id}  [{verdict}, {days}]  {} → {}  ({:.0} mi)",
            t.pickup_location, t.dropoff_location, t.total_distance_miles
        );
    }

    Ok(())
}

fn cmd_show(storage: &Storage, reference: &str, json: bool) -> Result<(), String> {
    let id = resolve_trip(storage, reference)?;
    let trip = storage
        .load_trip(id)
        .map_err(|e| format!("failed to load trip: {e}"))?;

    if json {
        let text = serde_json::to_string_pretty(&trip.plan)
            .map_err(|e| format!("failed to serialize plan: {e}"))?;
        println!("{text}");
    } else {
        println!(
            "{}  {} → {} → {}",
            &trip.id.to_string()[..8],
            trip.request.current_location,
            trip.request.pickup_location,
            trip.request.dropoff_location
        );
        println!();
        print!("{}", format_plan(&trip.plan));
    }

    Ok(())
}

/// Resolve a trip reference (full UUID or unambiguous prefix) to an ID.
fn resolve_trip(storage: &Storage, reference: &str) -> Result<Uuid, String> {
    // Try full UUID first.
    if let Ok(id) = reference.parse::<Uuid>() {
        return Ok(id);
    }

    // Try as a prefix match against all trips.
    let trips = storage
        .list_trips()
        .map_err(|e| format!("failed to list trips: {e}"))?;

    let matches: Vec<&TripSummary> = trips
        .iter()
        .filter(|t| t.id.to_string().starts_with(reference))
        .collect();

    match matches.len() {
        0 => Err(format!("no trip matching '{reference}'")),
        1 => Ok(matches[0].id),
        n => {
            let ids: Vec<String> = matches
                .iter()
                .map(|t| t.id.to_string()[..8].to_string())
                .collect();
            Err(format!(
                "'{reference}' is ambiguous, matching {n} trips: {}",
                ids.join(", ")
            ))
        }
    }
}
