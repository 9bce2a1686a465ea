use std::sync::Arc;
use serde_json::Value;
use tracing::{debug, info, instrument};

use models::{Item, ItemInput};

use crate::errors::ServiceError;
use crate::items::store::{ItemStore, MemoryItemStore};

/// Application service for items.
/// Runs schema validation ahead of the store and turns missing ids into
/// `ServiceError::NotFound`.
#[derive(Clone)]
pub struct ItemService {
    store: Arc<dyn ItemStore>,
}

impl ItemService {
    pub fn new(store: Arc<dyn ItemStore>) -> Self { Self { store } }

    /// Service over a fresh volatile store.
    pub fn in_memory() -> Self { Self::new(Arc::new(MemoryItemStore::new())) }

    /// Validate a raw JSON body into an `ItemInput`.
    pub fn parse_input(body: &Value) -> Result<ItemInput, ServiceError> {
        Ok(ItemInput::from_json(body)?)
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: ItemInput) -> Result<Item, ServiceError> {
        input.validate()?;
        let item = self.store.create(input).await?;
        info!(id = %item.id, "item created");
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Vec<Item> {
        let items = self.store.list().await;
        debug!(count = items.len(), "items listed");
        items
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Item, ServiceError> {
        self.store.get(id).await.ok_or_else(|| ServiceError::not_found("item", id))
    }

    /// Replaces every field except `id`; fields left out of `input` become absent.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: &str, input: ItemInput) -> Result<Item, ServiceError> {
        input.validate()?;
        let item = self.store.update(id, input).await?;
        info!(id = %item.id, "item replaced");
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        if self.store.delete(id).await? {
            info!(id, "item deleted");
            Ok(())
        } else {
            Err(ServiceError::not_found("item", id))
        }
    }
}
