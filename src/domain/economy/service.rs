//! Paid lookup services and their pricing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};

/// The fixed set of paid lookup services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Mobile,
    Aadhaar,
    Email,
    Telegram,
}

impl ServiceKind {
    /// All known services, in seeding order.
    pub const ALL: [ServiceKind; 4] = [
        ServiceKind::Mobile,
        ServiceKind::Aadhaar,
        ServiceKind::Email,
        ServiceKind::Telegram,
    ];

    /// Stable store key for this service.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Mobile => "mobile",
            ServiceKind::Aadhaar => "aadhaar",
            ServiceKind::Email => "email",
            ServiceKind::Telegram => "telegram",
        }
    }

    /// Default price seeded at initialization.
    pub fn default_price(&self) -> i64 {
        match self {
            ServiceKind::Mobile | ServiceKind::Aadhaar | ServiceKind::Email => 1,
            ServiceKind::Telegram => 5,
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ServiceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mobile" => Ok(ServiceKind::Mobile),
            "aadhaar" => Ok(ServiceKind::Aadhaar),
            "email" => Ok(ServiceKind::Email),
            "telegram" => Ok(ServiceKind::Telegram),
            other => Err(DomainError::new(
                ErrorCode::InvalidFormat,
                format!("Unknown service: {}", other),
            )),
        }
    }
}

/// Mutable price configuration for one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePrice {
    pub service: ServiceKind,
    /// Positive integer price in credits.
    pub price: i64,
    pub updated_at: Timestamp,
}

impl ServicePrice {
    /// Creates a price entry, rejecting non-positive prices.
    pub fn new(service: ServiceKind, price: i64) -> Result<Self, DomainError> {
        if price <= 0 {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                format!("Price for {} must be positive, got {}", service, price),
            ));
        }
        Ok(Self {
            service,
            price,
            updated_at: Timestamp::now(),
        })
    }

    /// The default price table seeded at initialization.
    pub fn defaults() -> Vec<ServicePrice> {
        ServiceKind::ALL
            .iter()
            .map(|service| ServicePrice {
                service: *service,
                price: service.default_price(),
                updated_at: Timestamp::now(),
            })
            .collect()
    }
}
