//! Storage capability traits
//!
//! `Store` is the backend handle selected once at startup; `Collection` is
//! the per-entity CRUD surface. Both backends implement the same contract so
//! the session layer stays backend-agnostic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{Ad, StoreError, TradingSignal};

/// Which backend a `Store` handle talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Device-scoped JSON files; survives restarts, never leaves the machine
    Local,
    /// Shared HTTP document store
    Remote,
    /// Volatile map, for tests
    Memory,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Local => "local",
            BackendKind::Remote => "remote",
            BackendKind::Memory => "memory",
        }
    }
}

/// Identity and ordering of a persisted entity
pub trait Entity {
    fn id(&self) -> &str;

    /// Timestamp used for most-recent-first ordering on collection reads
    fn ordering_time(&self) -> DateTime<Utc>;
}

impl Entity for TradingSignal {
    fn id(&self) -> &str {
        &self.id
    }

    fn ordering_time(&self) -> DateTime<Utc> {
        self.open_time
    }
}

impl Entity for Ad {
    fn id(&self) -> &str {
        &self.id
    }

    fn ordering_time(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Uniform CRUD surface over one entity collection
#[async_trait]
pub trait Collection<T>: Send + Sync {
    /// All entities, most recent first
    async fn get_all(&self) -> Result<Vec<T>, StoreError>;

    /// Insert a new entity at the front of the collection
    async fn add(&self, item: &T) -> Result<(), StoreError>;

    /// Replace the entity with the same id
    ///
    /// Policy: a no-op when the id is absent locally; an upsert on the
    /// remote backend. Callers always update after a read, so the
    /// difference is not observable in normal flow.
    async fn update(&self, item: &T) -> Result<(), StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// A selected persistence backend
#[async_trait]
pub trait Store: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Prepare the backend: seed on first run, probe connectivity
    ///
    /// A `StoreError::Connection` here means the backend is unreachable;
    /// callers decide whether that degrades the session or is tolerated.
    async fn init(&self) -> Result<(), StoreError>;

    fn signals(&self) -> &dyn Collection<TradingSignal>;

    fn ads(&self) -> &dyn Collection<Ad>;
}
