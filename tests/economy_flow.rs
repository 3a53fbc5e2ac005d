//! Integration tests for the credit economy engine.
//!
//! These tests verify the end-to-end flow:
//! 1. Presence events open sessions; reconciliation ticks settle them into minutes
//! 2. Minute totals translate into credits and levels at fixed boundaries
//! 3. Paid lookups gate on the earned balance with optimistic debit
//! 4. Failed lookups refund the debit; completed ones keep it
//!
//! Uses in-memory implementations to test the engine without external dependencies.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use voice_economy::adapters::memory::{
    InMemoryAccountStore, InMemoryPriceStore, InMemorySessionStore, RecordingNotifier,
    StaticVoiceProbe,
};
use voice_economy::application::{
    CreditLedger, PresenceTracker, RewardService, SearchOrchestrator,
};
use voice_economy::domain::economy::ServiceKind;
use voice_economy::domain::foundation::{ChannelId, GuildId, UserId};
use voice_economy::domain::lookup::{
    FailureCategory, LookupError, LookupPayload, LookupReport,
};
use voice_economy::domain::presence::VoiceLocation;
use voice_economy::ports::{AccountStore, LookupClient, PriceStore, SessionStore};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Upstream stub whose next response is scripted per test step.
struct ScriptedUpstream {
    responses: RwLock<Vec<Result<LookupPayload, LookupError>>>,
    calls: AtomicUsize,
}

impl ScriptedUpstream {
    fn new() -> Self {
        Self { responses: RwLock::new(Vec::new()), calls: AtomicUsize::new(0) }
    }

    async fn push(&self, response: Result<LookupPayload, LookupError>) {
        self.responses.write().await.push(response);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LookupClient for ScriptedUpstream {
    async fn fetch(
        &self,
        _service: ServiceKind,
        _query: &str,
    ) -> Result<LookupPayload, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut responses = self.responses.write().await;
        if responses.is_empty() {
            return Ok(LookupPayload::NoRecords);
        }
        responses.remove(0)
    }
}

struct Engine {
    accounts: Arc<InMemoryAccountStore>,
    sessions: Arc<InMemorySessionStore>,
    probe: Arc<StaticVoiceProbe>,
    notifier: Arc<RecordingNotifier>,
    upstream: Arc<ScriptedUpstream>,
    tracker: PresenceTracker,
    orchestrator: SearchOrchestrator,
}

async fn engine() -> Engine {
    let accounts = Arc::new(InMemoryAccountStore::new());
    let sessions = Arc::new(InMemorySessionStore::new());
    let probe = Arc::new(StaticVoiceProbe::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let prices = Arc::new(InMemoryPriceStore::new());
    prices.seed_defaults().await.unwrap();
    let upstream = Arc::new(ScriptedUpstream::new());

    let rewards = Arc::new(RewardService::new(accounts.clone(), notifier.clone()));
    let tracker = PresenceTracker::new(sessions.clone(), probe.clone(), rewards);
    let ledger = Arc::new(CreditLedger::new(accounts.clone(), prices));
    let orchestrator = SearchOrchestrator::new(ledger, upstream.clone());

    Engine { accounts, sessions, probe, notifier, upstream, tracker, orchestrator }
}

fn location() -> VoiceLocation {
    VoiceLocation::new(GuildId::new(1001), ChannelId::new(2002))
}

// =============================================================================
// End-to-End Scenarios
// =============================================================================

/// A user sits in voice long enough to earn credits and a level, then
/// spends the credits on lookups until the balance runs out.
#[tokio::test]
async fn earned_presence_funds_paid_lookups() {
    let e = engine().await;
    let user = UserId::new(1);

    e.probe.set_present(user, true).await;
    e.tracker.on_presence_start(user, location()).await.unwrap();
    e.sessions.age_session(user, 25 * 60).await;
    e.tracker.reconcile_tick().await.unwrap();

    // 25 minutes: two credits (10, 20) and one level (20).
    let account = e.accounts.get_or_create(user).await.unwrap();
    assert_eq!(account.voice_minutes, 25);
    assert_eq!(account.balance, 2);
    assert_eq!(account.level, 1);
    assert_eq!(e.notifier.events().await.len(), 1);

    // One mobile lookup costs 1 credit and completes.
    e.upstream
        .push(Ok(LookupPayload::SingleRecord(serde_json::json!({"name": "A"}))))
        .await;
    let report = e
        .orchestrator
        .execute(user, ServiceKind::Mobile, "7405453929")
        .await
        .unwrap();
    assert!(matches!(report, LookupReport::Results { charged: 1, .. }));

    // A telegram lookup costs 5; with 1 credit left it is rejected before
    // the upstream is ever contacted.
    let calls_before = e.upstream.calls();
    let report = e
        .orchestrator
        .execute(user, ServiceKind::Telegram, "someone")
        .await
        .unwrap();
    assert_eq!(
        report.failure_category(),
        Some(FailureCategory::InsufficientBalance)
    );
    assert_eq!(e.upstream.calls(), calls_before);
    assert_eq!(e.accounts.get_or_create(user).await.unwrap().balance, 1);
}

/// An upstream failure refunds the optimistic debit; a completed query
/// with no records does not.
#[tokio::test]
async fn refunds_follow_failures_not_empty_results() {
    let e = engine().await;
    let user = UserId::new(2);
    e.accounts.set_balance(user, 2).await.unwrap();

    e.upstream
        .push(Err(LookupError::Timeout { attempts: 3 }))
        .await;
    let report = e
        .orchestrator
        .execute(user, ServiceKind::Email, "a@b.example")
        .await
        .unwrap();
    assert_eq!(report.failure_category(), Some(FailureCategory::ExternalTimeout));
    assert!(!report.charge_stands());
    assert_eq!(e.accounts.get_or_create(user).await.unwrap().balance, 2);

    e.upstream.push(Ok(LookupPayload::NoRecords)).await;
    let report = e
        .orchestrator
        .execute(user, ServiceKind::Email, "a@b.example")
        .await
        .unwrap();
    assert!(matches!(report, LookupReport::NoRecords { charged: 1, .. }));
    assert_eq!(e.accounts.get_or_create(user).await.unwrap().balance, 1);
}

/// The event path and the tick path race on the session table without
/// double-counting any minute interval.
#[tokio::test]
async fn session_end_and_ticks_never_double_count() {
    let e = engine().await;
    let user = UserId::new(3);

    e.probe.set_present(user, true).await;
    e.tracker.on_presence_start(user, location()).await.unwrap();
    e.sessions.age_session(user, 11 * 60 + 30).await;
    e.tracker.reconcile_tick().await.unwrap();

    // 11 whole minutes settled; 30 seconds still pending.
    let settled = e.tracker.on_presence_end(user).await.unwrap();
    assert_eq!(settled, Some(11));

    // The duplicate end observes the row already gone.
    assert_eq!(e.tracker.on_presence_end(user).await.unwrap(), None);

    let account = e.accounts.get_or_create(user).await.unwrap();
    assert_eq!(account.voice_minutes, 11);
    assert_eq!(account.balance, 1);

    // A later tick with no session finds nothing to credit.
    let summary = e.tracker.reconcile_tick().await.unwrap();
    assert_eq!(summary.sessions_seen, 0);
    assert_eq!(account.voice_minutes, 11);
}

/// Sessions abandoned without any reconciliation inside the staleness
/// window are swept; minutes already settled stay settled.
#[tokio::test]
async fn stale_sessions_are_swept_and_keep_settled_minutes() {
    let e = engine().await;
    let user = UserId::new(4);

    e.probe.set_present(user, true).await;
    e.tracker.on_presence_start(user, location()).await.unwrap();
    e.sessions.age_session(user, 3 * 60).await;
    e.tracker.reconcile_tick().await.unwrap();

    // The gateway stops answering and no tick reconciles for 6 minutes.
    e.sessions.age_session(user, 6 * 60).await;
    let swept = e.tracker.sweep_stale().await.unwrap();
    assert_eq!(swept, 1);
    assert!(e.sessions.find(user).await.unwrap().is_none());

    let account = e.accounts.get_or_create(user).await.unwrap();
    assert_eq!(account.voice_minutes, 3);
}

/// Unlimited accounts skip the ledger entirely yet still earn presence
/// rewards like everyone else.
#[tokio::test]
async fn unlimited_accounts_bypass_charges_but_still_earn() {
    let e = engine().await;
    let user = UserId::new(5);
    e.accounts.set_unlimited(user, true).await.unwrap();

    e.probe.set_present(user, true).await;
    e.tracker.on_presence_start(user, location()).await.unwrap();
    e.sessions.age_session(user, 10 * 60).await;
    e.tracker.reconcile_tick().await.unwrap();

    e.upstream
        .push(Ok(LookupPayload::RecordList(vec![serde_json::json!({"name": "A"})])))
        .await;
    let report = e
        .orchestrator
        .execute(user, ServiceKind::Telegram, "someone")
        .await
        .unwrap();
    assert!(matches!(report, LookupReport::Results { charged: 0, .. }));

    // The credit earned in voice is untouched by the free lookup.
    let account = e.accounts.get_or_create(user).await.unwrap();
    assert_eq!(account.balance, 1);
    assert_eq!(account.voice_minutes, 10);
}
