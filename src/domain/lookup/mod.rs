//! Lookup domain - upstream payload shapes, failure taxonomy, and the
//! settled report a caller observes.

mod errors;
mod payload;
mod report;

pub use errors::{FailureCategory, LookupError};
pub use payload::LookupPayload;
pub use report::{AccountStats, LookupReport};
