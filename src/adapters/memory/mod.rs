//! In-process adapter implementations.
//!
//! Back the same ports as the postgres adapters with `tokio::sync::RwLock`
//! maps. Used by unit and integration tests, and usable for local runs
//! where durability does not matter.

mod account_store;
mod notifier;
mod price_store;
mod probe;
mod session_store;

pub use account_store::InMemoryAccountStore;
pub use notifier::RecordingNotifier;
pub use price_store::InMemoryPriceStore;
pub use probe::StaticVoiceProbe;
pub use session_store::InMemorySessionStore;
