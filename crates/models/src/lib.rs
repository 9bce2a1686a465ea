//! Domain model for the item store: the `Item` record, its create/update
//! payload, and the schema checks applied to incoming JSON.

pub mod errors;
pub mod item;

pub use errors::{FieldError, ModelError};
pub use item::{Item, ItemInput};
