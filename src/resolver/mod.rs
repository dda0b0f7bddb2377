use crate::vehicle::VehicleId;
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A vehicle's identity fields merged with the single state record whose
/// timestamp is the latest at or before the query instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleStateView {
    pub id: String,
    pub make: String,
    pub model: String,
    pub state: String,
    /// Unix epoch milliseconds of the winning state record
    pub timestamp: i64,
}

/// Read-only source of as-of vehicle state.
///
/// Implemented by the SQLite store; tests substitute counting doubles to
/// assert how often the backing store is actually hit.
pub trait StateSource: Send + Sync {
    /// Fetch the state record with the maximum timestamp <= `as_of_ms` for
    /// `vehicle_id`, joined with the vehicle's identity fields.
    ///
    /// Returns `Ok(None)` when the vehicle does not exist or has no state
    /// record at or before the instant. Errors are backing-store failures.
    fn fetch_as_of(&self, vehicle_id: &str, as_of_ms: i64)
        -> anyhow::Result<Option<VehicleStateView>>;
}

/// Resolution errors
#[derive(Debug)]
pub enum ResolveError {
    /// Malformed vehicle identifier (never touches the store)
    InvalidVehicleId(String),
    /// Malformed query timestamp (never touches the store)
    InvalidTimestamp(String),
    /// Vehicle absent, or no state record at or before the instant
    NotFound,
    /// Backing store unreachable or query failure
    Backend(anyhow::Error),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::InvalidVehicleId(msg) => write!(f, "Invalid vehicle ID: {}", msg),
            ResolveError::InvalidTimestamp(raw) => write!(
                f,
                "Invalid timestamp '{}': expected unix epoch milliseconds or RFC 3339",
                raw
            ),
            ResolveError::NotFound => write!(f, "Vehicle not found"),
            ResolveError::Backend(err) => write!(f, "State store failure: {}", err),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Parse a raw query timestamp into canonical unix epoch milliseconds.
///
/// Accepted forms:
/// - a positive integer, taken as epoch milliseconds
/// - an RFC 3339 datetime, converted to epoch milliseconds
///
/// Both forms normalize to the same `i64`, so equivalent spellings of one
/// instant produce identical cache keys downstream.
pub fn parse_timestamp(raw: &str) -> Result<i64, ResolveError> {
    if let Ok(ms) = raw.parse::<i64>() {
        if ms > 0 {
            return Ok(ms);
        }
        return Err(ResolveError::InvalidTimestamp(raw.to_string()));
    }

    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => {
            let ms = dt.timestamp_millis();
            if ms > 0 {
                Ok(ms)
            } else {
                Err(ResolveError::InvalidTimestamp(raw.to_string()))
            }
        }
        Err(_) => Err(ResolveError::InvalidTimestamp(raw.to_string())),
    }
}

/// As-of temporal resolver over a [`StateSource`].
///
/// Backward-looking nearest match only: the winning record has the maximum
/// timestamp <= the query instant, never a later one. Read-only, no internal
/// retries; a store failure surfaces as [`ResolveError::Backend`].
#[derive(Clone)]
pub struct Resolver {
    source: Arc<dyn StateSource>,
}

impl Resolver {
    pub fn new(source: Arc<dyn StateSource>) -> Self {
        Self { source }
    }

    /// Resolve the vehicle's state as of `as_of_ms`.
    ///
    /// Vehicle absence and state absence both map to `NotFound`; callers
    /// cannot distinguish them.
    pub fn resolve(
        &self,
        vehicle_id: &VehicleId,
        as_of_ms: i64,
    ) -> Result<VehicleStateView, ResolveError> {
        match self.source.fetch_as_of(vehicle_id.as_str(), as_of_ms) {
            Ok(Some(view)) => Ok(view),
            Ok(None) => Err(ResolveError::NotFound),
            Err(err) => Err(ResolveError::Backend(err)),
        }
    }
}
