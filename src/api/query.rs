use crate::cache::{CacheKey, QueryCache};
use crate::resolver::{parse_timestamp, ResolveError, Resolver, VehicleStateView};
use crate::vehicle::parse_vehicle_id;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

/// Shared state for the vehicle query API
pub struct QueryAppState {
    pub resolver: Resolver,
    pub cache: Arc<QueryCache>,
}

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Create vehicle query API router
pub fn create_query_router(state: Arc<QueryAppState>) -> Router {
    Router::new()
        .route(
            "/api/vehicles/:vehicle_id/:timestamp",
            get(get_vehicle_state),
        )
        .with_state(state)
}

/// GET /api/vehicles/:vehicle_id/:timestamp - Vehicle state as of an instant
///
/// `timestamp` is unix epoch milliseconds or RFC 3339; both normalize to the
/// same cache key. Returns the latest state recorded at or before that
/// instant, joined with the vehicle's identity fields:
///
/// ```json
/// { "id": "v1", "make": "Volvo", "model": "FH16", "state": "idle", "timestamp": 100 }
/// ```
async fn get_vehicle_state(
    State(state): State<Arc<QueryAppState>>,
    Path((vehicle_id, timestamp)): Path<(String, String)>,
) -> Result<Json<VehicleStateView>, ApiError> {
    // Validate both inputs before anything touches the store
    let vehicle_id = parse_vehicle_id(&vehicle_id)
        .map_err(|e| ResolveError::InvalidVehicleId(e.to_string()))?;
    let as_of_ms = parse_timestamp(&timestamp)?;

    let key = CacheKey::new(vehicle_id.as_str(), as_of_ms);
    if let Some(view) = state.cache.get(&key) {
        return Ok(Json(view));
    }

    let view = state.resolver.resolve(&vehicle_id, as_of_ms)?;

    // Only successful resolutions are cached
    state.cache.put(key, view.clone());

    Ok(Json(view))
}

/// Query error types
#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    NotFound,
    Internal,
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::InvalidVehicleId(_) | ResolveError::InvalidTimestamp(_) => {
                ApiError::BadRequest(err.to_string())
            }
            ResolveError::NotFound => ApiError::NotFound,
            ResolveError::Backend(e) => {
                // Details stay in the log; the client gets a generic signal
                error!(error = %e, "Vehicle state resolution failed");
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Vehicle not found".to_string()),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}
