//! HTTP adapters - outbound clients for upstream services.

mod osint_client;

pub use osint_client::{OsintClientConfig, ReqwestLookupClient};
