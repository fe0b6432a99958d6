//! Local persistence for computed trips.
//!
//! Each trip lives in its own `SQLite` file under the storage root:
//!
//! ```text
//! <root>/<uuid>.sqlite
//! ```
//!
//! One `trip` row carries the request fields, queryable summary columns,
//! and the full plan JSON.

mod trip;

use std::{fs, io, path::PathBuf};

use rusqlite::Connection;
use uuid::Uuid;

pub use trip::TripSummary;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("trip not found: {0}")]
    TripNotFound(Uuid),

    #[error("trip already exists: {0}")]
    TripAlreadyExists(Uuid),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupt trip record: {0}")]
    Corrupt(String),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// Local file-based storage for computed trips.
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Creates a new storage instance rooted at the given directory.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Returns the default storage root: `~/.roadlog/trips/`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".roadlog").join("trips"))
    }

    pub(crate) fn root(&self) -> &PathBuf {
        &self.root
    }

    fn trip_path(&self, id: Uuid) -> PathBuf {
        self.root.join(format!("{id}.sqlite"))
    }

    /// Creates the `SQLite` file and schema for a new trip.
    fn create_db(&self, id: Uuid) -> Result<Connection> {
        let path = self.trip_path(id);
        if path.exists() {
            return Err(StorageError::TripAlreadyExists(id));
        }
        let conn = Connection::open(&path)?;
        conn.execute_batch(
            "CREATE TABLE trip (
                id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                current_location TEXT NOT NULL,
                pickup_location TEXT NOT NULL,
                dropoff_location TEXT NOT NULL,
                current_cycle_hours REAL NOT NULL,
                total_distance_miles REAL NOT NULL,
                is_compliant INTEGER NOT NULL,
                requires_multi_day INTEGER NOT NULL,
                plan_json TEXT NOT NULL
            )",
        )?;
        Ok(conn)
    }

    /// Opens an existing trip's `SQLite` file.
    fn open_db(&self, id: Uuid) -> Result<Connection> {
        let path = self.trip_path(id);
        if !path.exists() {
            return Err(StorageError::TripNotFound(id));
        }
        Ok(Connection::open(&path)?)
    }
}
