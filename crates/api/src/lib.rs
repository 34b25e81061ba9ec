//! Climate Web API
//!
//! Axum-based read-only JSON API over the station measurement archive.

mod handlers;
mod responses;
mod routes;

pub use responses::{KeyedValue, TemperatureRange};
pub use routes::create_router;

use axum::{http::StatusCode, response::IntoResponse, Json};
use climate_database::{Database, ObservationWindow};
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

/// Station the temperature series is reported for
pub const DEFAULT_STATION: &str = "USC00519281";

/// Fixed query parameters for the window-based routes
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub window: ObservationWindow,
    pub station: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            window: ObservationWindow::default(),
            station: DEFAULT_STATION.to_string(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self::with_config(db, ApiConfig::default())
    }

    pub fn with_config(db: Database, config: ApiConfig) -> Self {
        Self { db, config }
    }
}

pub type SharedState = Arc<AppState>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] climate_database::DatabaseError),
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        error!("Request failed: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "success": false,
                "error": self.to_string(),
            })),
        )
            .into_response()
    }
}
