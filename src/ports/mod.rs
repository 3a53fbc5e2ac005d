//! Ports - interfaces between the application core and the outside world.
//!
//! Following hexagonal architecture, the application layer depends only on
//! these traits; concrete store, HTTP, and gateway implementations live in
//! `adapters`.

mod account_store;
mod lookup_client;
mod notifier;
mod price_store;
mod session_store;
mod voice_probe;

pub use account_store::{AccountStore, MinuteIncrement};
pub use lookup_client::LookupClient;
pub use notifier::{LevelUp, LevelUpNotifier};
pub use price_store::PriceStore;
pub use session_store::SessionStore;
pub use voice_probe::VoiceStateProbe;
