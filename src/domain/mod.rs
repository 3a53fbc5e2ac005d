//! Domain layer - pure types and rules, no I/O.

pub mod economy;
pub mod foundation;
pub mod lookup;
pub mod presence;
