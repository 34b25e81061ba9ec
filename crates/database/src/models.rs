//! Database models for the station measurement archive

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One weather observation from a station
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Measurement {
    pub id: i64,
    pub station: String,
    pub date: String,
    pub prcp: Option<f64>,
    pub tobs: Option<f64>,
}

/// A weather station
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Station {
    pub id: i64,
    pub station: String,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
}

/// Precipitation reading for a single measurement
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PrecipitationReading {
    pub date: String,
    pub prcp: Option<f64>,
}

/// Number of measurements recorded by a station
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StationActivity {
    pub station: String,
    pub observations: i64,
}

/// Temperature observation for a single measurement
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TemperatureObservation {
    pub station: String,
    pub date: String,
    pub tobs: Option<f64>,
}

/// Temperature aggregates for one date
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TemperatureSummary {
    pub date: String,
    pub min_tobs: Option<f64>,
    pub max_tobs: Option<f64>,
    pub avg_tobs: Option<f64>,
}

/// Inclusive date range used by the fixed-window queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservationWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ObservationWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Bounds in the text form dates are stored in
    pub fn bounds(&self) -> (String, String) {
        (
            self.start.format("%Y-%m-%d").to_string(),
            self.end.format("%Y-%m-%d").to_string(),
        )
    }
}

impl Default for ObservationWindow {
    /// The last year of data in the archive
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2016, 8, 23).expect("valid window start"),
            end: NaiveDate::from_ymd_opt(2017, 8, 23).expect("valid window end"),
        }
    }
}
