//! Background runners for the two periodic presence tasks.
//!
//! Each runner drives one tracker operation on a fixed-period
//! `tokio::time::interval` and stops on a `watch` shutdown signal. Tick
//! failures are logged and the loop continues: the periodic tasks are
//! crash-only-local, never fatal to the process.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::domain::foundation::DomainError;

use super::presence_tracker::{PresenceTracker, TickSummary};

/// Timer configuration for one background runner.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub interval: Duration,
}

impl RunnerConfig {
    /// Default reconciliation period: one minute.
    pub fn reconcile() -> Self {
        Self { interval: Duration::from_secs(60) }
    }

    /// Default stale-sweep period: five minutes.
    pub fn sweep() -> Self {
        Self { interval: Duration::from_secs(300) }
    }

    /// Overrides the tick interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// Periodic driver for [`PresenceTracker::reconcile_tick`].
pub struct ReconcileRunner {
    tracker: Arc<PresenceTracker>,
    config: RunnerConfig,
}

impl ReconcileRunner {
    pub fn new(tracker: Arc<PresenceTracker>) -> Self {
        Self { tracker, config: RunnerConfig::reconcile() }
    }

    pub fn with_config(tracker: Arc<PresenceTracker>, config: RunnerConfig) -> Self {
        Self { tracker, config }
    }

    /// Runs the reconciliation loop until the shutdown signal flips.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.interval);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::info!("Reconcile runner shutting down");
                        return;
                    }
                }
                _ = interval.tick() => {
                    match self.tracker.reconcile_tick().await {
                        Ok(summary) if summary.minutes_credited > 0 || summary.sessions_ended > 0 => {
                            tracing::debug!(
                                sessions = summary.sessions_seen,
                                credited = summary.minutes_credited,
                                ended = summary.sessions_ended,
                                "Reconcile tick"
                            );
                        }
                        Ok(_) => {}
                        Err(e) => {
                            tracing::warn!(error = %e, "Reconcile tick failed; retrying next period");
                        }
                    }
                }
            }
        }
    }

    /// Runs exactly one reconciliation pass (for tests).
    pub async fn tick_once(&self) -> Result<TickSummary, DomainError> {
        self.tracker.reconcile_tick().await
    }
}

/// Periodic driver for [`PresenceTracker::sweep_stale`].
pub struct SweepRunner {
    tracker: Arc<PresenceTracker>,
    config: RunnerConfig,
}

impl SweepRunner {
    pub fn new(tracker: Arc<PresenceTracker>) -> Self {
        Self { tracker, config: RunnerConfig::sweep() }
    }

    pub fn with_config(tracker: Arc<PresenceTracker>, config: RunnerConfig) -> Self {
        Self { tracker, config }
    }

    /// Runs the sweep loop until the shutdown signal flips.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.interval);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::info!("Sweep runner shutting down");
                        return;
                    }
                }
                _ = interval.tick() => {
                    if let Err(e) = self.tracker.sweep_stale().await {
                        tracing::warn!(error = %e, "Stale sweep failed; retrying next period");
                    }
                }
            }
        }
    }

    /// Runs exactly one sweep pass (for tests).
    pub async fn sweep_once(&self) -> Result<u64, DomainError> {
        self.tracker.sweep_stale().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryAccountStore, InMemorySessionStore, RecordingNotifier, StaticVoiceProbe,
    };
    use crate::application::RewardService;
    use crate::domain::foundation::{ChannelId, GuildId, UserId};
    use crate::domain::presence::VoiceLocation;
    use crate::ports::SessionStore;

    fn tracker() -> (Arc<InMemorySessionStore>, Arc<StaticVoiceProbe>, Arc<PresenceTracker>) {
        let accounts = Arc::new(InMemoryAccountStore::new());
        let sessions = Arc::new(InMemorySessionStore::new());
        let probe = Arc::new(StaticVoiceProbe::new());
        let rewards = Arc::new(RewardService::new(accounts, Arc::new(RecordingNotifier::new())));
        let tracker = Arc::new(PresenceTracker::new(sessions.clone(), probe.clone(), rewards));
        (sessions, probe, tracker)
    }

    #[tokio::test]
    async fn default_intervals_match_the_timers() {
        assert_eq!(RunnerConfig::reconcile().interval, Duration::from_secs(60));
        assert_eq!(RunnerConfig::sweep().interval, Duration::from_secs(300));
    }

    #[tokio::test]
    async fn reconcile_runner_stops_on_shutdown_signal() {
        let (_, _, tracker) = tracker();
        let config = RunnerConfig::reconcile().with_interval(Duration::from_millis(10));
        let runner = ReconcileRunner::with_config(tracker, config);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move { runner.run(shutdown_rx).await });

        tokio::time::sleep(Duration::from_millis(30)).await;
        shutdown_tx.send(true).unwrap();

        handle.await.unwrap();
    }

    #[tokio::test]
    async fn sweep_runner_deletes_stale_sessions_while_running() {
        let (sessions, probe, tracker) = tracker();
        let user = UserId::new(1);
        probe.set_present(user, true).await;
        tracker
            .on_presence_start(user, VoiceLocation::new(GuildId::new(1), ChannelId::new(2)))
            .await
            .unwrap();
        sessions.age_session(user, 600).await;

        let runner = SweepRunner::new(tracker);
        let swept = runner.sweep_once().await.unwrap();

        assert_eq!(swept, 1);
        assert!(sessions.find(user).await.unwrap().is_none());
    }
}
