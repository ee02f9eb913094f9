pub mod health;
pub mod temperature;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::common::AppState;
use crate::config::ConfigError;
use crate::services::rate_limit::ClientIpKeyExtractor;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        temperature::get_current,
        temperature::get_history,
        temperature::get_stats,
        temperature::generate_dummy,
    ),
    components(
        schemas(
            health::HealthResponse,
            temperature::ReadingResponse,
            temperature::HistoryResponse,
            temperature::StatsResponse,
            temperature::GenerateResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "temperature", description = "Temperature and humidity readings"),
    ),
    info(
        title = "SmartGarden Temperature API",
        description = "Temperature and humidity telemetry for the SmartGarden monitor",
        version = "0.1.0"
    )
)]
struct ApiDoc;

/// Build the application router.
///
/// # Errors
///
/// Returns `ConfigError::Invalid` if a rate limiter cannot be built from the
/// configured quota.
pub fn build_router(state: AppState) -> Result<Router, ConfigError> {
    let config = &state.config;

    if config.disable_rate_limiting {
        tracing::warn!("Rate limiting DISABLED");
    } else {
        tracing::info!(
            read_rate = %format!("1/{}ms burst {}", config.rate_limit_replenish_ms, config.rate_limit_burst),
            write_rate = %format!("1/{}ms burst {}", config.rate_limit_write_replenish_ms, config.rate_limit_write_burst),
            "Rate limiting configured"
        );
    }

    // Base routes without rate limiting
    let read_routes_base = Router::new()
        .route("/temperature", get(temperature::get_current))
        .route("/temperature/history", get(temperature::get_history))
        .route("/temperature/stats", get(temperature::get_stats));

    let write_routes_base =
        Router::new().route("/temperature/generate-dummy", post(temperature::generate_dummy));

    // Combine API routes, conditionally applying rate limiting
    let api_routes = if config.disable_rate_limiting {
        Router::new()
            .merge(read_routes_base)
            .merge(write_routes_base)
    } else {
        let read_limiter = GovernorConfigBuilder::default()
            .key_extractor(ClientIpKeyExtractor)
            .per_millisecond(config.rate_limit_replenish_ms)
            .burst_size(config.rate_limit_burst)
            .finish()
            .ok_or(ConfigError::Invalid("invalid read rate limit"))?;

        let write_limiter = GovernorConfigBuilder::default()
            .key_extractor(ClientIpKeyExtractor)
            .per_millisecond(config.rate_limit_write_replenish_ms)
            .burst_size(config.rate_limit_write_burst)
            .finish()
            .ok_or(ConfigError::Invalid("invalid write rate limit"))?;

        Router::new()
            .merge(read_routes_base.layer(GovernorLayer {
                config: Arc::new(read_limiter),
            }))
            .merge(write_routes_base.layer(GovernorLayer {
                config: Arc::new(write_limiter),
            }))
    }
    .route("/health", get(health::health)) // not rate limited
    .layer(RequestBodyLimitLayer::new(1024 * 1024)); // 1MB body limit

    // OpenAPI documentation
    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    // Combine all routes
    Ok(Router::new()
        .route("/", get(health::index))
        .nest("/api", api_routes)
        .merge(docs_routes)
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
