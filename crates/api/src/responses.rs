//! Shapes query rows into their JSON representation

use climate_database::{
    PrecipitationReading, StationActivity, TemperatureObservation, TemperatureSummary,
};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// A single-entry JSON object, `{key: value}`
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedValue<V> {
    pub key: String,
    pub value: V,
}

impl<V> KeyedValue<V> {
    pub fn new(key: impl Into<String>, value: V) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

impl<V: Serialize> Serialize for KeyedValue<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.key, &self.value)?;
        map.end()
    }
}

/// Temperature aggregates for one date of a requested range
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TemperatureRange {
    #[serde(rename = "Start Date")]
    pub start_date: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Minimum Temperature")]
    pub min: Option<f64>,
    #[serde(rename = "Maximum Temperature")]
    pub max: Option<f64>,
    #[serde(rename = "Average Temperature")]
    pub avg: Option<f64>,
}

/// `{date: prcp}` per reading, duplicates kept
pub fn precipitation_entries(rows: Vec<PrecipitationReading>) -> Vec<KeyedValue<Option<f64>>> {
    rows.into_iter()
        .map(|r| KeyedValue::new(r.date, r.prcp))
        .collect()
}

/// `{station: count}` per station, in ranking order
pub fn station_entries(rows: Vec<StationActivity>) -> Vec<KeyedValue<i64>> {
    rows.into_iter()
        .map(|r| KeyedValue::new(r.station, r.observations))
        .collect()
}

/// Station, date and observation of every row, one after another
pub fn flatten_observations(rows: Vec<TemperatureObservation>) -> Vec<Value> {
    rows.into_iter()
        .flat_map(|r| [Value::from(r.station), Value::from(r.date), Value::from(r.tobs)])
        .collect()
}

/// One range entry per summarised date, labelled with the requested start
pub fn temperature_ranges(start: &str, rows: Vec<TemperatureSummary>) -> Vec<TemperatureRange> {
    rows.into_iter()
        .map(|r| TemperatureRange {
            start_date: start.to_string(),
            date: r.date,
            min: r.min_tobs,
            max: r.max_tobs,
            avg: r.avg_tobs.map(round2),
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
