//! Reqwest implementation of LookupClient.
//!
//! Owns the retry loop, the exponential backoff, and the status
//! classification. Transient upstream conditions (502/503/504, timeouts,
//! transport errors) are retried with a `2^attempt` second backoff; access
//! failures (403/404) and unrecognized statuses fail immediately. A 200
//! body is decoded exactly once, here, into a [`LookupPayload`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use tokio::time::sleep;

use crate::domain::economy::ServiceKind;
use crate::domain::lookup::{LookupError, LookupPayload};
use crate::ports::LookupClient;

/// Statuses retried with backoff before giving up.
const RETRYABLE_STATUSES: [u16; 3] = [502, 503, 504];

/// Configuration for the upstream lookup client.
#[derive(Debug, Clone)]
pub struct OsintClientConfig {
    /// Endpoint serving mobile, aadhaar, and email lookups.
    pub details_url: String,
    /// Endpoint serving telegram lookups.
    pub telegram_url: String,
    /// API key sent with every request.
    api_key: Secret<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Attempts per lookup, including the first.
    pub max_retries: u32,
}

impl OsintClientConfig {
    /// Creates a configuration with the given endpoints and API key.
    pub fn new(
        details_url: impl Into<String>,
        telegram_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            details_url: details_url.into(),
            telegram_url: telegram_url.into(),
            api_key: Secret::new(api_key.into()),
            timeout: Duration::from_secs(30),
            max_retries: 3,
        }
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the attempt budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// How one response status settles an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusClass {
    Success,
    /// Worth another attempt after backoff.
    Retryable,
    /// Access denied or endpoint gone; retrying cannot help.
    Rejected,
    /// Outside the known status contract; fail fast.
    Unexpected,
}

fn classify_status(status: u16) -> StatusClass {
    match status {
        200 => StatusClass::Success,
        s if RETRYABLE_STATUSES.contains(&s) => StatusClass::Retryable,
        403 | 404 => StatusClass::Rejected,
        _ => StatusClass::Unexpected,
    }
}

/// Backoff before retry `attempt` (zero-based): 1s, 2s, 4s, ...
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.min(6))
}

/// Lookup client backed by reqwest.
pub struct ReqwestLookupClient {
    config: OsintClientConfig,
    client: Client,
}

impl ReqwestLookupClient {
    /// Creates a client with the given configuration.
    pub fn new(config: OsintClientConfig) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LookupError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Endpoint and query parameter name for a service.
    fn endpoint_of(&self, service: ServiceKind) -> (&str, &'static str) {
        match service {
            ServiceKind::Mobile | ServiceKind::Aadhaar | ServiceKind::Email => {
                (&self.config.details_url, "type")
            }
            ServiceKind::Telegram => (&self.config.telegram_url, "value"),
        }
    }

    async fn attempt(
        &self,
        service: ServiceKind,
        query: &str,
    ) -> Result<AttemptOutcome, LookupError> {
        let (url, param) = self.endpoint_of(service);

        let response = self
            .client
            .get(url)
            .header("X-Api-Key", self.config.api_key())
            .query(&[(param, query)])
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) if e.is_timeout() => return Ok(AttemptOutcome::TimedOut),
            Err(e) => return Ok(AttemptOutcome::NetworkError(e.to_string())),
        };

        let status = response.status().as_u16();
        match classify_status(status) {
            StatusClass::Success => {
                let body = response
                    .text()
                    .await
                    .map_err(|e| LookupError::Malformed(format!("Failed to read body: {}", e)))?;
                Ok(AttemptOutcome::Success(LookupPayload::decode(&body)))
            }
            StatusClass::Retryable => Ok(AttemptOutcome::Retryable(status)),
            StatusClass::Rejected => Err(LookupError::Rejected { status }),
            StatusClass::Unexpected => Err(LookupError::UnexpectedStatus { status }),
        }
    }
}

/// Outcome of one attempt that did not fail terminally.
enum AttemptOutcome {
    Success(LookupPayload),
    Retryable(u16),
    TimedOut,
    NetworkError(String),
}

#[async_trait]
impl LookupClient for ReqwestLookupClient {
    async fn fetch(
        &self,
        service: ServiceKind,
        query: &str,
    ) -> Result<LookupPayload, LookupError> {
        let attempts = self.config.max_retries;
        let mut last_transient: Option<LookupError> = None;

        for attempt in 0..attempts {
            if attempt > 0 {
                sleep(backoff_delay(attempt - 1)).await;
            }

            match self.attempt(service, query).await? {
                AttemptOutcome::Success(payload) => return Ok(payload),
                AttemptOutcome::Retryable(status) => {
                    tracing::warn!(
                        service = %service,
                        status,
                        attempt = attempt + 1,
                        attempts,
                        "Upstream unavailable; will retry"
                    );
                    last_transient = Some(LookupError::Unavailable { status, attempts });
                }
                AttemptOutcome::TimedOut => {
                    tracing::warn!(
                        service = %service,
                        attempt = attempt + 1,
                        attempts,
                        "Upstream timed out; will retry"
                    );
                    last_transient = Some(LookupError::Timeout { attempts });
                }
                AttemptOutcome::NetworkError(detail) => {
                    tracing::warn!(
                        service = %service,
                        attempt = attempt + 1,
                        attempts,
                        error = %detail,
                        "Network error; will retry"
                    );
                    last_transient = Some(LookupError::Network(detail));
                }
            }
        }

        Err(last_transient
            .unwrap_or_else(|| LookupError::Network("no attempts were made".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_gateway_statuses_are_retryable() {
        assert_eq!(classify_status(200), StatusClass::Success);
        assert_eq!(classify_status(502), StatusClass::Retryable);
        assert_eq!(classify_status(503), StatusClass::Retryable);
        assert_eq!(classify_status(504), StatusClass::Retryable);
        assert_eq!(classify_status(403), StatusClass::Rejected);
        assert_eq!(classify_status(404), StatusClass::Rejected);
        assert_eq!(classify_status(500), StatusClass::Unexpected);
        assert_eq!(classify_status(418), StatusClass::Unexpected);
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        assert_eq!(backoff_delay(0), Duration::from_secs(1));
        assert_eq!(backoff_delay(1), Duration::from_secs(2));
        assert_eq!(backoff_delay(2), Duration::from_secs(4));
        // Capped so a miscounted attempt cannot produce an hour-long sleep.
        assert_eq!(backoff_delay(40), Duration::from_secs(64));
    }

    #[test]
    fn services_route_to_their_endpoints() {
        let config = OsintClientConfig::new(
            "https://upstream.example/details",
            "https://upstream.example/telegram",
            "k",
        );
        let client = ReqwestLookupClient::new(config).unwrap();

        let (url, param) = client.endpoint_of(ServiceKind::Mobile);
        assert_eq!(url, "https://upstream.example/details");
        assert_eq!(param, "type");

        let (url, param) = client.endpoint_of(ServiceKind::Telegram);
        assert_eq!(url, "https://upstream.example/telegram");
        assert_eq!(param, "value");
    }

    #[test]
    fn max_retries_never_drops_below_one() {
        let config = OsintClientConfig::new("d", "t", "k").with_max_retries(0);
        assert_eq!(config.max_retries, 1);
    }
}
