//! Presence domain - open voice-channel occupancy records.

mod session;

pub use session::{PresenceSession, VoiceLocation};
