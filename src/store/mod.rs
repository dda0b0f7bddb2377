//! Vehicle and state-log storage backed by SQLite.
//!
//! The service only reads: vehicles and their state logs are written by an
//! external ingestion path. The one query this module serves is the as-of
//! lookup — the latest state record at or before a given instant.

use crate::resolver::{StateSource, VehicleStateView};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

/// As-of query: among the vehicle's state records with timestamp <= the query
/// instant, pick the one with the maximum timestamp. Ties at equal timestamps
/// go to the highest record id (latest insertion).
const AS_OF_QUERY: &str = r#"
    SELECT v.id, v.make, v.model, s.state, s.timestamp
    FROM vehicles v
    JOIN state_logs s ON s.vehicle_id = v.id
    WHERE v.id = ?1 AND s.timestamp <= ?2
    ORDER BY s.timestamp DESC, s.id DESC
    LIMIT 1
"#;

/// Read-only vehicle state store backed by SQLite.
///
/// # Schema
/// ```sql
/// CREATE TABLE vehicles (
///     id TEXT PRIMARY KEY,
///     make TEXT NOT NULL,
///     model TEXT NOT NULL
/// );
/// CREATE TABLE state_logs (
///     id INTEGER PRIMARY KEY,           -- insertion order, tie-break key
///     vehicle_id TEXT NOT NULL,
///     state TEXT NOT NULL,
///     timestamp INTEGER NOT NULL        -- unix epoch milliseconds
/// );
/// ```
///
/// `state_logs` is append-only; rows are never mutated in place. Timestamps
/// are stored and compared as integers, so ordering is total and independent
/// of any timezone interpretation.
///
/// # Thread Safety
/// - Connection is wrapped in Mutex for safe concurrent access
/// - The lock is acquired and released per query, never held across requests
pub struct StateStore {
    conn: Mutex<Connection>,
}

impl StateStore {
    /// Opens the state database, creating the schema if absent.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path).context("Failed to open state database")?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS vehicles (
                id TEXT PRIMARY KEY,
                make TEXT NOT NULL,
                model TEXT NOT NULL
            )
            "#,
            [],
        )
        .context("Failed to create vehicles table")?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS state_logs (
                id INTEGER PRIMARY KEY,
                vehicle_id TEXT NOT NULL,
                state TEXT NOT NULL,
                timestamp INTEGER NOT NULL
            )
            "#,
            [],
        )
        .context("Failed to create state_logs table")?;

        // Covering index for the as-of lookup
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_state_logs_vehicle_ts
             ON state_logs(vehicle_id, timestamp)",
            [],
        )
        .context("Failed to create index")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Liveness check, run once at startup before the service begins serving.
    pub fn ping(&self) -> Result<()> {
        self.conn
            .lock()
            .unwrap()
            .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .context("State database liveness check failed")?;
        Ok(())
    }

    /// Fetch the vehicle's state as of `as_of_ms`.
    ///
    /// Returns `Ok(None)` when the vehicle does not exist or has no state
    /// record at or before the instant — the two cases are not distinguished.
    pub fn fetch_as_of(&self, vehicle_id: &str, as_of_ms: i64) -> Result<Option<VehicleStateView>> {
        let conn = self.conn.lock().unwrap();

        let view = conn
            .query_row(AS_OF_QUERY, params![vehicle_id, as_of_ms], |row| {
                Ok(VehicleStateView {
                    id: row.get(0)?,
                    make: row.get(1)?,
                    model: row.get(2)?,
                    state: row.get(3)?,
                    timestamp: row.get(4)?,
                })
            })
            .optional()
            .context("Failed to query vehicle state")?;

        Ok(view)
    }
}

impl StateSource for StateStore {
    fn fetch_as_of(
        &self,
        vehicle_id: &str,
        as_of_ms: i64,
    ) -> Result<Option<VehicleStateView>> {
        StateStore::fetch_as_of(self, vehicle_id, as_of_ms)
    }
}
