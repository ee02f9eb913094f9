use std::sync::Arc;

use crate::config::Config;
use crate::services::telemetry::TelemetryService;

/// Handler state. The service owns the storage handle; nothing else is shared
/// between requests.
#[derive(Clone)]
pub struct AppState {
    pub telemetry: TelemetryService,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(telemetry: TelemetryService, config: Config) -> Self {
        Self {
            telemetry,
            config: Arc::new(config),
        }
    }
}
