//! API request handlers

use crate::responses::{self, KeyedValue, TemperatureRange};
use crate::{Result, SharedState};
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse},
    Json,
};
use serde_json::Value;
use tracing::debug;

const INDEX_HTML: &str = r#"<h1>Welcome to the Climate App API</h1>
<h2>Available routes:</h2>
<h3>/api/v1.0/precipitation</h3>
<h3>/api/v1.0/stations</h3>
<h3>/api/v1.0/tobs</h3>
<h3>/api/v1.0/&lt;start&gt;</h3>
<h4>In place of start, enter a date between 2010-01-01 and 2017-08-23 in YYYY-MM-DD format</h4>
<h3>/api/v1.0/&lt;start&gt;/&lt;end&gt;</h3>
<h4>In place of start and end, enter a date between 2010-01-01 and 2017-08-23 in YYYY-MM-DD format</h4>
"#;

/// Landing page listing the available routes
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Precipitation for every measurement in the observation window
pub async fn precipitation(
    State(state): State<SharedState>,
) -> Result<Json<Vec<KeyedValue<Option<f64>>>>> {
    let rows = state.db.get_precipitation(&state.config.window).await?;
    Ok(Json(responses::precipitation_entries(rows)))
}

/// Stations ranked by number of measurements
pub async fn stations(State(state): State<SharedState>) -> Result<Json<Vec<KeyedValue<i64>>>> {
    let rows = state.db.get_station_activity().await?;
    Ok(Json(responses::station_entries(rows)))
}

/// Temperature observations of the configured station in the observation window
pub async fn tobs(State(state): State<SharedState>) -> Result<Json<Vec<Value>>> {
    let rows = state
        .db
        .get_station_temperatures(&state.config.station, &state.config.window)
        .await?;
    Ok(Json(responses::flatten_observations(rows)))
}

/// Per-date temperature summaries from `start` onwards
pub async fn temperature_from(
    State(state): State<SharedState>,
    Path(start): Path<String>,
) -> Result<Json<Vec<TemperatureRange>>> {
    debug!(start = %start, "Summarising temperatures");
    let rows = state.db.get_temperature_summaries(&start, None).await?;
    Ok(Json(responses::temperature_ranges(&start, rows)))
}

/// Per-date temperature summaries between `start` and `end` inclusive
pub async fn temperature_between(
    State(state): State<SharedState>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<Vec<TemperatureRange>>> {
    debug!(start = %start, end = %end, "Summarising temperatures");
    let rows = state.db.get_temperature_summaries(&start, Some(&end)).await?;
    Ok(Json(responses::temperature_ranges(&start, rows)))
}
