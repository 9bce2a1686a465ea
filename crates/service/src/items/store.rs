use async_trait::async_trait;
use models::{Item, ItemInput};

use crate::errors::ServiceError;
use crate::storage::memory_map_store::MemoryMapStore;

/// Trait abstraction for item storage. Implementations must make each call
/// atomic: an update or delete never observes a half-applied concurrent write.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn list(&self) -> Vec<Item>;
    async fn get(&self, id: &str) -> Option<Item>;
    async fn create(&self, input: ItemInput) -> Result<Item, ServiceError>;
    /// Full replace of every field except `id`.
    async fn update(&self, id: &str, input: ItemInput) -> Result<Item, ServiceError>;
    /// Returns whether the id existed.
    async fn delete(&self, id: &str) -> Result<bool, ServiceError>;
}

/// Volatile store keyed by item id.
#[derive(Clone, Default)]
pub struct MemoryItemStore {
    items: MemoryMapStore<String, Item>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn list(&self) -> Vec<Item> {
        self.items.values().await
    }

    async fn get(&self, id: &str) -> Option<Item> {
        self.items.get(&id.to_string()).await
    }

    async fn create(&self, input: ItemInput) -> Result<Item, ServiceError> {
        self.items
            .update_map(|map| {
                // v4 collisions are practically impossible, but ids must stay unique.
                let mut item = Item::create(input.clone());
                while map.contains_key(&item.id) {
                    item = Item::create(input.clone());
                }
                map.insert(item.id.clone(), item.clone());
                Ok(item)
            })
            .await
    }

    async fn update(&self, id: &str, input: ItemInput) -> Result<Item, ServiceError> {
        self.items
            .update_map(|map| {
                let existing = map.get_mut(id).ok_or_else(|| ServiceError::not_found("item", id))?;
                *existing = Item::with_id(id.to_string(), input);
                Ok(existing.clone())
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        Ok(self.items.remove(&id.to_string()).await.is_some())
    }
}
