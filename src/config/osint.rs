//! Upstream lookup API configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use crate::adapters::http::OsintClientConfig;

use super::error::ValidationError;

/// Configuration for the upstream lookup API.
#[derive(Debug, Clone, Deserialize)]
pub struct OsintConfig {
    /// Endpoint serving mobile, aadhaar, and email lookups.
    pub details_url: String,

    /// Endpoint serving telegram lookups.
    pub telegram_url: String,

    /// API key sent with every request.
    pub api_key: Secret<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Attempts per lookup, including the first.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl OsintConfig {
    /// Get the request timeout as Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Builds the client configuration from this section.
    pub fn client_config(&self) -> OsintClientConfig {
        OsintClientConfig::new(
            self.details_url.clone(),
            self.telegram_url.clone(),
            self.api_key.expose_secret().clone(),
        )
        .with_timeout(self.timeout())
        .with_max_retries(self.max_retries)
    }

    /// Validate the upstream configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for url in [&self.details_url, &self.telegram_url] {
            if url.is_empty() {
                return Err(ValidationError::MissingRequired("OSINT endpoint URL"));
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidUpstreamUrl);
            }
        }
        if self.api_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("OSINT__API_KEY"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_retries == 0 {
            return Err(ValidationError::InvalidRetryBudget);
        }
        Ok(())
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}
