//! HTTP surface for the dashboard.
//!
//! # Endpoints
//!
//! - `GET /api/data`: every stored day keyed by date, most recent first
//! - `GET /log_entry?data=<urlencoded JSON>`: captures a freeform entry
//!   (`{"text": "...", "date": "YYYY-MM-DD"}`) into the remote `chat_logs`
//!   collection
//! - `GET /health`: health check
//!
//! Anything else falls through to the dashboard assets when a static
//! directory is configured.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::aggregate::{aggregate_days, keyed_by_date};
use crate::db::DayRepository;
use crate::remote::{Collection, RemoteStore};
use crate::sync::ChatLogPayload;

/// Status recorded for entries captured but not yet processed.
pub const PENDING_STATUS: &str = "pending";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub repo: DayRepository,
    /// Absent when no remote store is configured; entries are then only logged.
    pub remote: Option<Arc<dyn RemoteStore>>,
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn api_data(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let views = aggregate_days(&state.repo).await.map_err(|e| {
        tracing::error!("Failed to read days: {}", e);
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "failed to read days")
    })?;

    let body = keyed_by_date(views)
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(body))
}

#[derive(Debug, Deserialize)]
struct LogEntryQuery {
    data: Option<String>,
}

/// Freeform entry as sent by the dashboard.
#[derive(Debug, Deserialize)]
struct LogEntry {
    text: String,
    date: Option<String>,
}

#[derive(Serialize)]
struct LogEntryResponse {
    status: &'static str,
}

async fn log_entry(
    State(state): State<AppState>,
    Query(query): Query<LogEntryQuery>,
) -> Result<Json<LogEntryResponse>, ApiError> {
    let data = query
        .data
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "missing data parameter"))?;

    let entry: LogEntry = serde_json::from_str(&data).map_err(|e| {
        ApiError::new(StatusCode::BAD_REQUEST, format!("invalid entry: {}", e))
    })?;
    if entry.text.trim().is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "text is required"));
    }

    let date = entry
        .date
        .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());

    let Some(remote) = &state.remote else {
        tracing::info!(%date, "entry received (no remote configured): {}", entry.text);
        return Ok(Json(LogEntryResponse { status: "ok" }));
    };

    let row = serde_json::to_value(ChatLogPayload {
        date: &date,
        text: &entry.text,
        status: PENDING_STATUS,
    })
    .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    remote
        .create(Collection::ChatLogs, &row)
        .await
        .map_err(|e| {
            tracing::warn!(%date, error = %e, "failed to forward entry");
            ApiError::new(StatusCode::BAD_GATEWAY, e.to_string())
        })?;

    tracing::info!(%date, "entry forwarded");
    Ok(Json(LogEntryResponse { status: "ok" }))
}

pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/api/data", get(api_data))
        .route("/log_entry", get(log_entry))
        .with_state(state);

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http())
}
