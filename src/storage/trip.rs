//! Trip persistence: create, load, and list computed trips.

use std::{fs, io};

use jiff::Timestamp;
use rusqlite::Connection;
use uuid::Uuid;

use crate::model::{Trip, TripRequest};

use super::{Result, Storage, StorageError};

/// One row of `trip list`: summary columns only, no plan JSON parse.
#[derive(Debug, Clone)]
pub struct TripSummary {
    pub id: Uuid,
    pub created_at: Timestamp,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub total_distance_miles: f64,
    pub is_compliant: bool,
    pub requires_multi_day: bool,
}

impl Storage {
    /// Creates a new trip, writing its record to a new `SQLite` file.
    pub fn create_trip(&self, trip: &Trip) -> Result<()> {
        let conn = self.create_db(trip.id)?;
        let plan_json = serde_json::to_string(&trip.plan)?;
        conn.execute(
            "INSERT INTO trip (id, created_at, current_location, pickup_location,
                               dropoff_location, current_cycle_hours, total_distance_miles,
                               is_compliant, requires_multi_day, plan_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                trip.id.to_string(),
                trip.created_at.to_string(),
                &trip.request.current_location,
                &trip.request.pickup_location,
                &trip.request.dropoff_location,
                trip.request.current_cycle_hours,
                trip.plan.route_summary.total_distance_miles,
                i64::from(trip.plan.hos_compliance.is_compliant),
                i64::from(trip.plan.hos_compliance.requires_multi_day),
                plan_json,
            ],
        )?;
        Ok(())
    }

    /// Loads a single trip, including its full plan.
    pub fn load_trip(&self, id: Uuid) -> Result<Trip> {
        let conn = self.open_db(id)?;
        load_trip_row(&conn)
    }

    /// Lists trip summaries by reading each `.sqlite` file in the root.
    ///
    /// Unreadable or malformed files are silently skipped.
    pub fn list_trips(&self) -> Result<Vec<TripSummary>> {
        let mut trips = Vec::new();
        let entries = match fs::read_dir(self.root()) {
            Ok(e) => e,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(trips),
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("sqlite") {
                continue;
            }
            let Ok(conn) = Connection::open(&path) else {
                continue;
            };
            if let Ok(summary) = load_summary_row(&conn) {
                trips.push(summary);
            }
        }
        trips.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(trips)
    }
}

/// Reads the single trip row, plan included, from an open connection.
fn load_trip_row(conn: &Connection) -> Result<Trip> {
    let (id_str, created_at_str, current, pickup, dropoff, cycle_hours, plan_json) = conn
        .query_row(
            "SELECT id, created_at, current_location, pickup_location, dropoff_location,
                    current_cycle_hours, plan_json
             FROM trip LIMIT 1",
            [],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, f64>(5)?,
                    row.get::<_, String>(6)?,
                ))
            },
        )?;

    let id = id_str
        .parse::<Uuid>()
        .map_err(|e| StorageError::Corrupt(format!("invalid trip id: {e}")))?;
    let created_at = created_at_str
        .parse::<Timestamp>()
        .map_err(|e| StorageError::Corrupt(format!("invalid created_at: {e}")))?;
    let plan = serde_json::from_str(&plan_json)?;

    Ok(Trip {
        id,
        created_at,
        request: TripRequest {
            current_location: current,
            pickup_location: pickup,
            dropoff_location: dropoff,
            current_cycle_hours: cycle_hours,
        },
        plan,
    })
}

/// Reads the summary columns from an open connection.
fn load_summary_row(conn: &Connection) -> Result<TripSummary> {
    let (id_str, created_at_str, pickup, dropoff, miles, compliant, multi_day) = conn.query_row(
        "SELECT id, created_at, pickup_location, dropoff_location,
                total_distance_miles, is_compliant, requires_multi_day
         FROM trip LIMIT 1",
        [],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, f64>(4)?,
                row.get::<_, i64>(5)?,
                row.get::<_, i64>(6)?,
            ))
        },
    )?;

    let id = id_str
        .parse::<Uuid>()
        .map_err(|e| StorageError::Corrupt(format!("invalid trip id: {e}")))?;
    let created_at = created_at_str
        .parse::<Timestamp>()
        .map_err(|e| StorageError::Corrupt(format!("invalid created_at: {e}")))?;

    Ok(TripSummary {
        id,
        created_at,
        pickup_location: pickup,
        dropoff_location: dropoff,
        total_distance_miles: miles,
        is_compliant: compliant != 0,
        requires_multi_day: multi_day != 0,
    })
}
