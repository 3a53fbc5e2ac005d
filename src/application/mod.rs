//! Application layer - services composing the ports.

mod background;
mod ledger;
mod presence_tracker;
mod rewards;
mod search;

pub use background::{ReconcileRunner, RunnerConfig, SweepRunner};
pub use ledger::{Affordability, CreditLedger, DebitOutcome};
pub use presence_tracker::{PresenceTracker, TickSummary};
pub use rewards::RewardService;
pub use search::SearchOrchestrator;
