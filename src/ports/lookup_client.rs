//! LookupClient port - outbound calls to the upstream OSINT API.

use async_trait::async_trait;

use crate::domain::economy::ServiceKind;
use crate::domain::lookup::{LookupError, LookupPayload};

/// Port for executing one paid lookup against the upstream API.
///
/// Implementations own retries, backoff, and status classification; the
/// orchestrator only ever sees a decoded payload or a categorized
/// [`LookupError`].
#[async_trait]
pub trait LookupClient: Send + Sync {
    /// Executes the lookup for `query` against the given service.
    async fn fetch(
        &self,
        service: ServiceKind,
        query: &str,
    ) -> Result<LookupPayload, LookupError>;
}
