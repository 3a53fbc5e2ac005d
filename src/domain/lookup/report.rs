//! Terminal report for a settled lookup.

use serde::{Deserialize, Serialize};

use crate::domain::economy::ServiceKind;
use crate::domain::lookup::{FailureCategory, LookupPayload};

/// Account snapshot attached to reports for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStats {
    pub balance: i64,
    pub level: u32,
    pub voice_minutes: u64,
}

/// What a caller observes once a lookup has settled.
///
/// Always terminal: results, an explicit empty-results notice, or a
/// categorized failure. A debited-but-unsettled state is never exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookupReport {
    /// The query completed and returned data; the debit stands.
    Results {
        service: ServiceKind,
        query: String,
        payload: LookupPayload,
        charged: i64,
    },
    /// The query completed with no records; the debit still stands.
    NoRecords {
        service: ServiceKind,
        query: String,
        charged: i64,
    },
    /// Rejected before any side effect: balance below price.
    Rejected {
        service: ServiceKind,
        price: i64,
        stats: AccountStats,
    },
    /// The call failed; the debited amount was refunded.
    Refunded {
        service: ServiceKind,
        query: String,
        category: FailureCategory,
        refunded: i64,
        detail: String,
    },
}

impl LookupReport {
    /// The failure category, if this report is a failure.
    pub fn failure_category(&self) -> Option<FailureCategory> {
        match self {
            LookupReport::Rejected { .. } => Some(FailureCategory::InsufficientBalance),
            LookupReport::Refunded { category, .. } => Some(*category),
            _ => None,
        }
    }

    /// True when the query completed and the debit (if any) stands.
    pub fn charge_stands(&self) -> bool {
        matches!(
            self,
            LookupReport::Results { .. } | LookupReport::NoRecords { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_reports_insufficient_balance() {
        let report = LookupReport::Rejected {
            service: ServiceKind::Mobile,
            price: 1,
            stats: AccountStats { balance: 0, level: 0, voice_minutes: 0 },
        };
        assert_eq!(
            report.failure_category(),
            Some(FailureCategory::InsufficientBalance)
        );
    }

    #[test]
    fn refunded_carries_its_category() {
        let report = LookupReport::Refunded {
            service: ServiceKind::Telegram,
            query: "someone".into(),
            category: FailureCategory::ExternalTimeout,
            refunded: 5,
            detail: "upstream timed out after 3 attempts".into(),
        };
        assert_eq!(report.failure_category(), Some(FailureCategory::ExternalTimeout));
    }

    #[test]
    fn successful_reports_have_no_failure_category() {
        let report = LookupReport::NoRecords {
            service: ServiceKind::Email,
            query: "a@b.c".into(),
            charged: 1,
        };
        assert_eq!(report.failure_category(), None);
    }
}
