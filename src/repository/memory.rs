//! In-memory store used when no database is reachable

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;

use super::{Entity, Store, StoreMode};
use crate::error::{AppError, AppResult};

/// Ordered in-memory collection keyed by id
pub struct MemoryStore<T: Entity> {
    records: RwLock<IndexMap<String, T>>,
}

impl<T: Entity> MemoryStore<T> {
    pub fn new(records: Vec<T>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.id().to_string(), record))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }

    /// Store pre-filled with the entity's example records
    pub fn seeded() -> Self {
        Self::new(T::seed())
    }
}

#[async_trait]
impl<T: Entity> Store<T> for MemoryStore<T> {
    fn mode(&self) -> StoreMode {
        StoreMode::Memory
    }

    async fn list(&self) -> AppResult<Vec<T>> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn list_where(&self, view: T::View) -> AppResult<Vec<T>> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .filter(|record| record.matches(view))
            .cloned()
            .collect())
    }

    async fn find_by(&self, column: &str, value: &str) -> AppResult<Vec<T>> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .filter(|record| record.field(column) == Some(value))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> AppResult<Option<T>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn insert(&self, record: &T) -> AppResult<()> {
        let mut records = self.records.write().await;
        if records.contains_key(record.id()) {
            return Err(AppError::Conflict(format!(
                "{} {} already exists",
                T::NAME,
                record.id()
            )));
        }
        records.insert(record.id().to_string(), record.clone());
        Ok(())
    }

    async fn update(&self, id: &str, patch: T::Patch) -> AppResult<Option<T>> {
        let mut records = self.records.write().await;
        Ok(records.get_mut(id).map(|record| {
            record.apply(patch);
            record.clone()
        }))
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        Ok(self.records.write().await.shift_remove(id).is_some())
    }
}
