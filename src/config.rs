use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub enum Deployment {
    Local,
    Dev,
    Stage,
    Prod,
}

impl Deployment {
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Self::Dev,
            "stage" | "staging" => Self::Stage,
            "prod" | "production" => Self::Prod,
            _ => Self::Local,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub database_url: String,

    // API settings
    pub api_host: String,
    pub api_port: u16,

    // Readings
    pub default_location: String,
    pub seed_count: u64,
    pub history_default_limit: u64,
    pub history_max_limit: u64,
    pub generate_default_count: u64,
    pub generate_max_count: u64,
    pub retention_max_rows: Option<u64>,

    // Rate limiting
    pub disable_rate_limiting: bool,
    /// One request of quota is restored every this many milliseconds.
    pub rate_limit_replenish_ms: u64,
    pub rate_limit_burst: u32,
    pub rate_limit_write_replenish_ms: u64,
    pub rate_limit_write_burst: u32,

    // Application metadata
    pub deployment: Deployment,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://temperature.db?mode=rwc".to_string(),
            api_host: "0.0.0.0".to_string(),
            api_port: 8000,
            default_location: "SmartGarden Home".to_string(),
            seed_count: 10,
            history_default_limit: 50,
            history_max_limit: 1000,
            generate_default_count: 10,
            generate_max_count: 1000,
            retention_max_rows: None,
            disable_rate_limiting: false,
            rate_limit_replenish_ms: 100,
            rate_limit_burst: 60,
            rate_limit_write_replenish_ms: 1000,
            rate_limit_write_burst: 10,
            deployment: Deployment::Local,
        }
    }
}

/// Read `key` and parse it, keeping `default` when unset or malformed.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every setting has a default, so an empty environment yields
    /// [`Config::default`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` when the resulting limits contradict each other.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let config = Self {
            // Database
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),

            // API settings
            api_host: env::var("API_HOST").unwrap_or(defaults.api_host),
            api_port: env_or("API_PORT", defaults.api_port),

            // Readings
            default_location: env::var("DEFAULT_LOCATION").unwrap_or(defaults.default_location),
            seed_count: env_or("SEED_COUNT", defaults.seed_count),
            history_default_limit: env_or("HISTORY_DEFAULT_LIMIT", defaults.history_default_limit),
            history_max_limit: env_or("HISTORY_MAX_LIMIT", defaults.history_max_limit),
            generate_default_count: env_or(
                "GENERATE_DEFAULT_COUNT",
                defaults.generate_default_count,
            ),
            generate_max_count: env_or("GENERATE_MAX_COUNT", defaults.generate_max_count),
            retention_max_rows: env::var("RETENTION_MAX_ROWS")
                .ok()
                .and_then(|v| v.trim().parse().ok()),

            // Rate limiting
            disable_rate_limiting: env_or("DISABLE_RATE_LIMITING", defaults.disable_rate_limiting),
            rate_limit_replenish_ms: env_or(
                "RATE_LIMIT_REPLENISH_MS",
                defaults.rate_limit_replenish_ms,
            ),
            rate_limit_burst: env_or("RATE_LIMIT_BURST", defaults.rate_limit_burst),
            rate_limit_write_replenish_ms: env_or(
                "RATE_LIMIT_WRITE_REPLENISH_MS",
                defaults.rate_limit_write_replenish_ms,
            ),
            rate_limit_write_burst: env_or("RATE_LIMIT_WRITE_BURST", defaults.rate_limit_write_burst),

            // Application metadata
            deployment: Deployment::from_str(
                &env::var("DEPLOYMENT").unwrap_or_else(|_| "local".to_string()),
            ),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check that the paging and generation defaults sit inside their maxima.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_default_limit > self.history_max_limit {
            return Err(ConfigError::Invalid(
                "HISTORY_DEFAULT_LIMIT exceeds HISTORY_MAX_LIMIT",
            ));
        }
        if self.generate_default_count > self.generate_max_count {
            return Err(ConfigError::Invalid(
                "GENERATE_DEFAULT_COUNT exceeds GENERATE_MAX_COUNT",
            ));
        }
        if self.retention_max_rows == Some(0) {
            return Err(ConfigError::Invalid("RETENTION_MAX_ROWS must be positive"));
        }
        if !self.disable_rate_limiting
            && (self.rate_limit_replenish_ms == 0
                || self.rate_limit_write_replenish_ms == 0
                || self.rate_limit_burst == 0
                || self.rate_limit_write_burst == 0)
        {
            return Err(ConfigError::Invalid("rate limits must be positive"));
        }
        Ok(())
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}
