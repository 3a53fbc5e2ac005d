//! SearchOrchestrator - gates, executes, and settles one paid lookup.
//!
//! Per request the flow is Gating -> Debited -> Calling -> Settled. Currency
//! is spent optimistically, before the outcome of the call is known
//! ("pay to ask"); a completed query keeps the debit even when it returns
//! zero records, and any call failure is compensated by refunding exactly
//! the debited amount. Once debited, a request always reaches a terminal
//! report; there is no mid-flight cancellation.

use std::sync::Arc;

use crate::domain::economy::ServiceKind;
use crate::domain::foundation::{DomainError, UserId};
use crate::domain::lookup::LookupReport;
use crate::ports::LookupClient;

use super::ledger::{CreditLedger, DebitOutcome};

/// Composes the ledger and the external call client into settled lookups.
pub struct SearchOrchestrator {
    ledger: Arc<CreditLedger>,
    client: Arc<dyn LookupClient>,
}

impl SearchOrchestrator {
    pub fn new(ledger: Arc<CreditLedger>, client: Arc<dyn LookupClient>) -> Self {
        Self { ledger, client }
    }

    /// Executes one paid lookup end to end.
    ///
    /// Store failures surface as `Err`; everything the upstream can do
    /// wrong settles into a categorized [`LookupReport`].
    pub async fn execute(
        &self,
        user: UserId,
        service: ServiceKind,
        query: &str,
    ) -> Result<LookupReport, DomainError> {
        // Gating and debit are one conditional decrement in the store.
        let charged = match self.ledger.debit(user, service).await? {
            DebitOutcome::Unlimited => 0,
            DebitOutcome::Debited(amount) => amount,
            DebitOutcome::InsufficientFunds { price, stats } => {
                tracing::debug!(user = %user, service = %service, price, "Lookup rejected: insufficient balance");
                return Ok(LookupReport::Rejected { service, price, stats });
            }
        };

        match self.client.fetch(service, query).await {
            Ok(payload) if payload.is_empty() => {
                tracing::info!(user = %user, service = %service, "Lookup completed with no records");
                Ok(LookupReport::NoRecords {
                    service,
                    query: query.to_string(),
                    charged,
                })
            }
            Ok(payload) => {
                tracing::info!(
                    user = %user,
                    service = %service,
                    records = payload.record_count(),
                    "Lookup completed"
                );
                Ok(LookupReport::Results {
                    service,
                    query: query.to_string(),
                    payload,
                    charged,
                })
            }
            Err(err) => {
                if charged > 0 {
                    self.ledger.refund(user, charged).await?;
                }
                let category = err.category();
                tracing::warn!(
                    user = %user,
                    service = %service,
                    category = category.as_str(),
                    error = %err,
                    "Lookup failed; charge refunded"
                );
                Ok(LookupReport::Refunded {
                    service,
                    query: query.to_string(),
                    category,
                    refunded: charged,
                    detail: err.to_string(),
                })
            }
        }
    }
}
