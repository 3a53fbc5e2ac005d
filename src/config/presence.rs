//! Presence reconciliation timer configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Timers for the presence reconciliation and sweep tasks.
#[derive(Debug, Clone, Deserialize)]
pub struct PresenceConfig {
    /// Seconds between reconciliation ticks.
    #[serde(default = "default_reconcile_interval")]
    pub reconcile_interval_secs: u64,

    /// Seconds between stale-session sweeps.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Seconds without reconciliation before a session counts as stale.
    #[serde(default = "default_stale_after")]
    pub stale_after_secs: u64,
}

impl PresenceConfig {
    /// Get the reconcile interval as Duration.
    pub fn reconcile_interval(&self) -> Duration {
        Duration::from_secs(self.reconcile_interval_secs)
    }

    /// Get the sweep interval as Duration.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Validate the presence timers.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.reconcile_interval_secs == 0 || self.sweep_interval_secs == 0 {
            return Err(ValidationError::InvalidPresenceInterval);
        }
        // A threshold shorter than the tick period would sweep live sessions.
        if self.stale_after_secs < self.reconcile_interval_secs {
            return Err(ValidationError::InvalidPresenceInterval);
        }
        Ok(())
    }
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            reconcile_interval_secs: default_reconcile_interval(),
            sweep_interval_secs: default_sweep_interval(),
            stale_after_secs: default_stale_after(),
        }
    }
}

fn default_reconcile_interval() -> u64 {
    60
}

fn default_sweep_interval() -> u64 {
    300
}

fn default_stale_after() -> u64 {
    300
}
