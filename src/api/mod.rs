use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    EcoRouteError,
    models::{Coordinate, TransportMode},
    routing::{Place, PlaceSearch, RouteComparison, RoutePlanner},
    trips::{DEFAULT_RECENT_LIMIT, TripRecord, TripStats, TripStore},
};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<RoutePlanner>,
    pub places: Arc<dyn PlaceSearch>,
    pub trips: TripStore,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin: Coordinate,
    pub destination: Coordinate,
}

#[derive(Debug, Deserialize)]
pub struct PlaceQuery {
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TripRequest {
    pub mode: TransportMode,
    pub distance_km: f64,
    #[serde(default)]
    pub elevation_gain_m: u32,
    #[serde(default)]
    pub eco_score: f64,
    /// Defaults to now
    pub recorded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/routes", post(compare_routes))
        .route("/places", get(search_places))
        .route("/trips/{user}", post(save_trip).get(recent_trips))
        .route("/trips/{user}/stats", get(trip_stats))
        .with_state(state)
}

async fn compare_routes(
    State(state): State<AppState>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<RouteComparison>, EcoRouteError> {
    let comparison = state
        .planner
        .plan(request.origin, request.destination)
        .await?;
    Ok(Json(comparison))
}

async fn search_places(
    State(state): State<AppState>,
    Query(query): Query<PlaceQuery>,
) -> Result<Json<Vec<Place>>, EcoRouteError> {
    Ok(Json(state.places.search(&query.q).await?))
}

async fn save_trip(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(request): Json<TripRequest>,
) -> Result<Json<TripStats>, EcoRouteError> {
    let trip = TripRecord::new(
        request.mode,
        request.distance_km,
        request.elevation_gain_m,
        request.eco_score,
        request.recorded_at.unwrap_or_else(Utc::now),
        &state.planner.engine().emissions,
    )?;
    Ok(Json(state.trips.save_trip(&user, trip).await?))
}

/// Newest first; `limit` defaults to [`DEFAULT_RECENT_LIMIT`]
async fn recent_trips(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<TripRecord>>, EcoRouteError> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    Ok(Json(state.trips.recent_trips(&user, limit).await?))
}

async fn trip_stats(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<TripStats>, EcoRouteError> {
    Ok(Json(state.trips.stats(&user).await?))
}

impl EcoRouteError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            EcoRouteError::Validation { .. } | EcoRouteError::UnknownMode { .. } => {
                StatusCode::BAD_REQUEST
            }
            EcoRouteError::NoRoutes { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            EcoRouteError::Provider { .. } => StatusCode::BAD_GATEWAY,
            EcoRouteError::Config { .. } | EcoRouteError::Cache { .. } | EcoRouteError::Io { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for EcoRouteError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }
        let body = Json(json!({
            "error": self.user_message(),
            "detail": self.to_string(),
        }));
        (status, body).into_response()
    }
}
