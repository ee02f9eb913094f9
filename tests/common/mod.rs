//! Shared fixtures: an in-memory SQLite store with the schema applied.

#![allow(dead_code)]

use std::sync::Arc;

use smartgarden_api::common::AppState;
use smartgarden_api::config::Config;
use smartgarden_api::services::generator::ReadingGenerator;
use smartgarden_api::services::storage::Storage;
use smartgarden_api::services::telemetry::TelemetryService;

pub const LOCATION: &str = "SmartGarden Home";

pub async fn storage() -> Storage {
    let db = smartgarden_api::connect_and_migrate("sqlite::memory:")
        .await
        .expect("in-memory database");
    Storage::new(db, LOCATION)
}

pub async fn service() -> TelemetryService {
    TelemetryService::new(storage().await, Arc::new(ReadingGenerator::seeded(42)))
}

pub fn test_config() -> Config {
    Config {
        disable_rate_limiting: true,
        ..Config::default()
    }
}

pub async fn app_state(config: Config) -> AppState {
    let telemetry = service().await.with_retention(config.retention_max_rows);
    AppState::new(telemetry, config)
}
