use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;

/// Service name reported by the health and index endpoints
pub const SERVICE_NAME: &str = "SmartGarden Temperature API";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// ISO-8601 time the check was answered
    pub timestamp: String,
    pub service: String,
}

/// Health check endpoint
///
/// Returns 200 OK if the service is running. Does not touch storage and is
/// not rate-limited, so it is suitable for liveness probes.
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    ),
    tag = "health"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        service: SERVICE_NAME.to_string(),
    })
}

/// Service index listing the available endpoints
pub async fn index() -> Json<Value> {
    Json(json!({
        "message": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "health": "/api/health",
            "current_temperature": "/api/temperature",
            "history": "/api/temperature/history",
            "stats": "/api/temperature/stats",
            "generate_dummy": "/api/temperature/generate-dummy",
            "docs": "/docs",
        }
    }))
}
