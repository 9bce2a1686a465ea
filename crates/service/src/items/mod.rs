//! Item CRUD: the storage seam (`ItemStore`), its in-memory implementation,
//! and the `ItemService` the HTTP layer talks to.

pub mod service;
pub mod store;

pub use service::ItemService;
pub use store::{ItemStore, MemoryItemStore};
