//! Shared building blocks for the item store workspace:
//! logging setup and response types used by more than one crate.

pub mod types;
pub mod utils;
