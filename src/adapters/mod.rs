//! Adapters implementing the outbound ports.
//!
//! `postgres` holds the durable stores, `http` the upstream lookup client,
//! and `memory` the in-process implementations used by tests and local runs.

pub mod http;
pub mod memory;
pub mod postgres;
