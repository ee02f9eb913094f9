use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use crate::common::AppState;
use crate::error::{AppError, AppResult};
use crate::services::telemetry::TimeSpread;

use super::types::{
    GenerateQuery, GenerateResponse, HistoryQuery, HistoryResponse, ReadingResponse,
    StatsResponse,
};

/// Resolve an optional integer parameter against its default and inclusive maximum.
fn bounded_param(name: &str, value: Option<i64>, default: u64, max: u64) -> AppResult<u64> {
    let Some(value) = value else {
        return Ok(default);
    };

    u64::try_from(value)
        .ok()
        .filter(|v| *v <= max)
        .ok_or_else(|| {
            AppError::InvalidParameter(format!("{name} must be between 0 and {max}, got {value}"))
        })
}

/// Get the current reading
///
/// Returns the most recent reading. On an empty store a reading is generated,
/// stored, and returned.
#[utoipa::path(
    get,
    path = "/api/temperature",
    responses(
        (status = 200, description = "Current reading", body = ReadingResponse),
        (status = 500, description = "Storage unavailable"),
    ),
    tag = "temperature"
)]
pub async fn get_current(State(state): State<AppState>) -> AppResult<Json<ReadingResponse>> {
    let reading = state.telemetry.get_current().await?;
    Ok(Json(reading.into()))
}

/// Get reading history
///
/// Returns up to `limit` readings ordered by timestamp, newest first.
#[utoipa::path(
    get,
    path = "/api/temperature/history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "History retrieved successfully", body = HistoryResponse),
        (status = 400, description = "Invalid limit"),
        (status = 500, description = "Storage unavailable"),
    ),
    tag = "temperature"
)]
pub async fn get_history(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> AppResult<Json<HistoryResponse>> {
    let Query(query) = query?;
    let limit = bounded_param(
        "limit",
        query.limit,
        state.config.history_default_limit,
        state.config.history_max_limit,
    )?;

    let (history, count) = state.telemetry.get_history(limit).await?;

    Ok(Json(HistoryResponse {
        history: history.into_iter().map(ReadingResponse::from).collect(),
        count,
    }))
}

/// Get aggregate statistics
///
/// Average, minimum, and maximum temperature plus average humidity across all
/// readings, rounded to one decimal. All fields are 0 when no readings exist.
#[utoipa::path(
    get,
    path = "/api/temperature/stats",
    responses(
        (status = 200, description = "Statistics computed successfully", body = StatsResponse),
        (status = 500, description = "Storage unavailable"),
    ),
    tag = "temperature"
)]
pub async fn get_stats(State(state): State<AppState>) -> AppResult<Json<StatsResponse>> {
    let stats = state.telemetry.get_stats().await?;
    Ok(Json(stats.into()))
}

/// Generate dummy readings
///
/// Inserts `count` synthetic readings with timestamps spread over the past.
#[utoipa::path(
    post,
    path = "/api/temperature/generate-dummy",
    params(GenerateQuery),
    responses(
        (status = 200, description = "Readings generated", body = GenerateResponse),
        (status = 400, description = "Invalid count or spread"),
        (status = 429, description = "Rate limited"),
        (status = 500, description = "Storage unavailable"),
    ),
    tag = "temperature"
)]
pub async fn generate_dummy(
    State(state): State<AppState>,
    query: Result<Query<GenerateQuery>, QueryRejection>,
) -> AppResult<Json<GenerateResponse>> {
    let Query(query) = query?;
    let count = bounded_param(
        "count",
        query.count,
        state.config.generate_default_count,
        state.config.generate_max_count,
    )?;

    let spread = match query.spread.as_deref() {
        None => TimeSpread::default(),
        Some(name) => TimeSpread::parse(name).ok_or_else(|| {
            AppError::InvalidParameter(format!(
                "spread must be one of random, hourly, five-minutes, got '{name}'"
            ))
        })?,
    };

    let inserted = state.telemetry.seed_dummy(count, spread).await?;

    Ok(Json(GenerateResponse {
        message: format!("Generated {inserted} dummy records"),
        count: inserted,
    }))
}
