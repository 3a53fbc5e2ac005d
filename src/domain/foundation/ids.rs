//! Strongly-typed identifier value objects.
//!
//! Chat-platform snowflake identifiers are externally assigned u64 values;
//! the newtypes keep user, guild, and channel ids from being mixed up.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a user, assigned by the chat platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Creates a UserId from a raw snowflake.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw snowflake value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Unique identifier for a guild (server).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuildId(u64);

impl GuildId {
    /// Creates a GuildId from a raw snowflake.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw snowflake value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for GuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a voice channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(u64);

impl ChannelId {
    /// Creates a ChannelId from a raw snowflake.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw snowflake value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_displays_raw_value() {
        let id = UserId::new(1355605971858100249);
        assert_eq!(format!("{}", id), "1355605971858100249");
        assert_eq!(id.value(), 1355605971858100249);
    }

    #[test]
    fn ids_are_distinct_types_with_equal_values() {
        let user = UserId::new(42);
        let same = UserId::from(42);
        assert_eq!(user, same);
    }
}
