use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use smartgarden_api::common::AppState;
use smartgarden_api::config::Config;
use smartgarden_api::routes;
use smartgarden_api::services::generator::ReadingGenerator;
use smartgarden_api::services::storage::Storage;
use smartgarden_api::services::telemetry::TelemetryService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing (LOG_FORMAT=json for JSON lines)
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,smartgarden_api=debug".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("Starting smartgarden-api...");

    // Load configuration (fail-fast)
    let config = Config::from_env()?;
    tracing::info!(
        deployment = ?config.deployment,
        host = %config.api_host,
        port = config.api_port,
        retention_max_rows = ?config.retention_max_rows,
        "Configuration loaded"
    );

    // Connect to database and run migrations (fail-fast)
    tracing::info!("Connecting to database...");
    let db = smartgarden_api::connect_and_migrate(&config.database_url).await?;
    tracing::info!("Database ready");

    let storage = Storage::new(db, config.default_location.clone());
    let telemetry = TelemetryService::new(storage, Arc::new(ReadingGenerator::from_entropy()))
        .with_retention(config.retention_max_rows);

    // Seed an empty store so the dashboard has something to show
    let seeded = telemetry.seed_if_empty(config.seed_count).await?;
    if seeded > 0 {
        tracing::info!(count = seeded, "Generated initial records");
    }

    let state = AppState::new(telemetry, config.clone());
    let app = routes::build_router(state)?;

    // Start server with graceful shutdown
    let addr = config.bind_address();
    tracing::info!(address = %addr, "Starting server");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        },
    }
}
