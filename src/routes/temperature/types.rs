use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entity::temperature_data;
use crate::services::telemetry::Stats;

/// Unit label attached to every serialized reading
pub const TEMPERATURE_UNIT: &str = "celsius";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReadingResponse {
    /// Temperature in °C
    pub temperature: f64,
    /// Relative humidity in %
    pub humidity: f64,
    /// ISO-8601 time of the reading
    pub timestamp: DateTime<Utc>,
    pub location: String,
    /// Always "celsius"
    pub unit: String,
}

impl From<temperature_data::Model> for ReadingResponse {
    fn from(model: temperature_data::Model) -> Self {
        Self {
            temperature: model.temperature,
            humidity: model.humidity,
            timestamp: model.timestamp,
            location: model.location,
            unit: TEMPERATURE_UNIT.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HistoryResponse {
    /// Readings, newest first
    pub history: Vec<ReadingResponse>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatsResponse {
    pub average_temperature: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub average_humidity: f64,
}

impl From<Stats> for StatsResponse {
    fn from(stats: Stats) -> Self {
        Self {
            average_temperature: stats.average_temperature,
            min_temperature: stats.min_temperature,
            max_temperature: stats.max_temperature,
            average_humidity: stats.average_humidity,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateResponse {
    pub message: String,
    pub count: u64,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Maximum number of readings to return (default 50)
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GenerateQuery {
    /// Number of readings to generate (default 10)
    pub count: Option<i64>,
    /// Timestamp spread: random (default), hourly, five-minutes
    pub spread: Option<String>,
}
