//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::catalog::CatalogError;
use crate::dashboard::{DashboardError, DashboardSnapshot};
use crate::domain::StationCode;
use crate::reconcile::RailStationHeader;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/dashboard", get(dashboard))
        .route("/api/stations", get(stations))
        .route("/api/rail/:index", put(set_rail_station))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Current state of every panel.
async fn dashboard(State(state): State<AppState>) -> Json<DashboardSnapshot> {
    Json(state.dashboard.snapshot().await)
}

/// Every station, ordered by name.
async fn stations(State(state): State<AppState>) -> Json<StationListResponse> {
    let stations = state
        .catalog
        .all_stations()
        .into_iter()
        .map(StationResult::from_station)
        .collect();

    Json(StationListResponse { stations })
}

/// Point a rail panel at another station.
async fn set_rail_station(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(req): Json<SetRailStationRequest>,
) -> Result<Json<RailStationHeader>, AppError> {
    let code = StationCode::parse_normalized(&req.code).map_err(|_| AppError::BadRequest {
        message: format!("Invalid station code: {}", req.code),
    })?;

    let header = state
        .dashboard
        .set_rail_station(index, code.as_str())
        .await?;

    Ok(Json(header))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<DashboardError> for AppError {
    fn from(e: DashboardError) -> Self {
        match e {
            DashboardError::Catalog(CatalogError::NotFound(_)) | DashboardError::NoSuchPanel(_) => {
                AppError::NotFound {
                    message: e.to_string(),
                }
            }
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
