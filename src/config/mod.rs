//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `VOICE_ECONOMY_` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use voice_economy::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod error;
mod osint;
mod presence;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use osint::OsintConfig;
pub use presence::PresenceConfig;

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Upstream lookup API configuration
    pub osint: OsintConfig,

    /// Presence reconciliation timers
    #[serde(default)]
    pub presence: PresenceConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `VOICE_ECONOMY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `VOICE_ECONOMY__DATABASE__URL=...` -> `database.url = ...`
    /// - `VOICE_ECONOMY__OSINT__API_KEY=...` -> `osint.api_key = ...`
    /// - `VOICE_ECONOMY__PRESENCE__RECONCILE_INTERVAL_SECS=60`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("VOICE_ECONOMY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.database.validate()?;
        self.osint.validate()?;
        self.presence.validate()?;
        Ok(())
    }
}
