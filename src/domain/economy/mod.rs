//! Economy domain - accounts, service pricing, and reward translation.

mod account;
mod rewards;
mod service;

pub use account::Account;
pub use rewards::{rewards_between, RewardDelta, MINUTES_PER_CREDIT, MINUTES_PER_LEVEL};
pub use service::{ServiceKind, ServicePrice};
