//! Voice Economy - Credit economy and voice-presence reconciliation engine.
//!
//! This crate tracks continuous voice-channel presence, converts elapsed
//! presence into credits and levels exactly once per unit of time, and gates
//! paid external lookups against the resulting balance with optimistic debit
//! and refund-on-failure settlement.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod observability;
pub mod ports;
