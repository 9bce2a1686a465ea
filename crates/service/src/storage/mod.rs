//! Storage abstractions for service layer
//!
//! Contains reusable in-process stores shared by the domain stores, so the
//! locking discipline lives in one place.

pub mod memory_map_store;
