//! Failure taxonomy for paid lookups.

use serde::{Deserialize, Serialize};

/// User-visible category for a settled lookup failure.
///
/// Every category except `InsufficientBalance` implies the optimistic debit
/// was refunded before the failure was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureCategory {
    /// Balance below price; rejected before any side effect.
    InsufficientBalance,
    /// Upstream unavailable or overloaded after exhausting retries.
    ExternalUnavailable,
    /// Upstream timed out after exhausting retries.
    ExternalTimeout,
    /// Upstream denied access or the endpoint is gone; not retried.
    ExternalRejected,
    /// Upstream returned a shape we could not interpret.
    ExternalMalformed,
}

impl FailureCategory {
    /// Stable tag for logs and presentation.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureCategory::InsufficientBalance => "insufficient_balance",
            FailureCategory::ExternalUnavailable => "external_unavailable",
            FailureCategory::ExternalTimeout => "external_timeout",
            FailureCategory::ExternalRejected => "external_rejected",
            FailureCategory::ExternalMalformed => "external_malformed",
        }
    }
}

/// Errors produced by the external call client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LookupError {
    #[error("upstream unavailable (status {status}) after {attempts} attempts")]
    Unavailable { status: u16, attempts: u32 },

    #[error("upstream timed out after {attempts} attempts")]
    Timeout { attempts: u32 },

    #[error("upstream rejected the request with status {status}")]
    Rejected { status: u16 },

    #[error("unexpected upstream status {status}")]
    UnexpectedStatus { status: u16 },

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed upstream payload: {0}")]
    Malformed(String),
}

impl LookupError {
    /// Maps a client error to its user-visible failure category.
    pub fn category(&self) -> FailureCategory {
        match self {
            LookupError::Unavailable { .. } | LookupError::Network(_) => {
                FailureCategory::ExternalUnavailable
            }
            LookupError::Timeout { .. } => FailureCategory::ExternalTimeout,
            LookupError::Rejected { .. } => FailureCategory::ExternalRejected,
            LookupError::UnexpectedStatus { .. } => FailureCategory::ExternalRejected,
            LookupError::Malformed(_) => FailureCategory::ExternalMalformed,
        }
    }
}
