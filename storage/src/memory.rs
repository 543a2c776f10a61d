//! In-memory backend for testing and development

use async_trait::async_trait;
use common::{Ad, StoreError, TradingSignal};
use tokio::sync::RwLock;

use crate::store::{BackendKind, Collection, Entity, Store};

/// Volatile collection backed by a `RwLock<Vec<T>>`
pub struct MemoryCollection<T> {
    items: RwLock<Vec<T>>,
}

impl<T> MemoryCollection<T> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }
}

impl<T> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> Collection<T> for MemoryCollection<T>
where
    T: Entity + Clone + Send + Sync,
{
    async fn get_all(&self) -> Result<Vec<T>, StoreError> {
        let items = self.items.read().await;
        Ok(items.clone())
    }

    async fn add(&self, item: &T) -> Result<(), StoreError> {
        let mut items = self.items.write().await;
        items.insert(0, item.clone());
        Ok(())
    }

    async fn update(&self, item: &T) -> Result<(), StoreError> {
        let mut items = self.items.write().await;
        if let Some(existing) = items.iter_mut().find(|i| i.id() == item.id()) {
            *existing = item.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut items = self.items.write().await;
        items.retain(|i| i.id() != id);
        Ok(())
    }
}

/// Volatile store used by tests; `init()` is a no-op
pub struct MemoryStore {
    signals: MemoryCollection<TradingSignal>,
    ads: MemoryCollection<Ad>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            signals: MemoryCollection::new(),
            ads: MemoryCollection::new(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    async fn init(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn signals(&self) -> &dyn Collection<TradingSignal> {
        &self.signals
    }

    fn ads(&self) -> &dyn Collection<Ad> {
        &self.ads
    }
}
