//! Remote backend: one document per entity in a shared HTTP store
//!
//! Two named collections (`signals`, `ads`), each document addressed by its
//! entity id. Writes are upserts by id. Collection reads are sorted most
//! recent first after fetch.
//!
//! Failure policy: a failed `init()` probe is a connection-level error the
//! caller may treat as fatal-to-degraded; a failed collection read degrades
//! to an empty list with a logged warning so a partial load (signals fail,
//! ads succeed) never blocks the other collection. Writes surface their
//! errors.

use std::marker::PhantomData;

use async_trait::async_trait;
use common::{Ad, StoreError, TradingSignal};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::seed;
use crate::store::{BackendKind, Collection, Entity, Store};

const API_KEY_HEADER: &str = "x-api-key";

/// Connection settings for the remote document store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: String,
}

struct RemoteCollection<T> {
    client: reqwest::Client,
    config: RemoteConfig,
    name: &'static str,
    _entity: PhantomData<fn() -> T>,
}

impl<T> RemoteCollection<T>
where
    T: Entity + Serialize + DeserializeOwned + Send + Sync,
{
    fn new(client: reqwest::Client, config: RemoteConfig, name: &'static str) -> Self {
        Self {
            client,
            config,
            name,
            _entity: PhantomData,
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/collections/{}", self.config.base_url.trim_end_matches('/'), self.name)
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url(), id)
    }

    async fn put(&self, item: &T) -> Result<(), StoreError> {
        let response = self
            .client
            .put(self.document_url(item.id()))
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(item)
            .send()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        response
            .error_for_status()
            .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl<T> Collection<T> for RemoteCollection<T>
where
    T: Entity + Serialize + DeserializeOwned + Send + Sync,
{
    async fn get_all(&self) -> Result<Vec<T>, StoreError> {
        // Read failures degrade to an empty collection; the session can
        // still run on whatever the other collection returned.
        let response = match self
            .client
            .get(self.collection_url())
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await
            .and_then(|r| r.error_for_status())
        {
            Ok(response) => response,
            Err(e) => {
                warn!(collection = self.name, error = %e, "remote fetch failed, starting empty");
                return Ok(Vec::new());
            }
        };

        let mut items: Vec<T> = match response.json().await {
            Ok(items) => items,
            Err(e) => {
                warn!(collection = self.name, error = %e, "remote payload unreadable, starting empty");
                return Ok(Vec::new());
            }
        };

        items.sort_by_key(|i| std::cmp::Reverse(i.ordering_time()));
        Ok(items)
    }

    async fn add(&self, item: &T) -> Result<(), StoreError> {
        self.put(item).await
    }

    async fn update(&self, item: &T) -> Result<(), StoreError> {
        // Upsert by id; the remote store has no absent-id distinction.
        self.put(item).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.document_url(id))
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        response
            .error_for_status()
            .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(())
    }
}

/// HTTP document store shared across devices
pub struct RemoteStore {
    signals: RemoteCollection<TradingSignal>,
    ads: RemoteCollection<Ad>,
}

impl RemoteStore {
    pub fn new(config: RemoteConfig) -> Self {
        let client = reqwest::Client::new();
        Self {
            signals: RemoteCollection::new(client.clone(), config.clone(), "signals"),
            ads: RemoteCollection::new(client, config, "ads"),
        }
    }
}

#[async_trait]
impl Store for RemoteStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    async fn init(&self) -> Result<(), StoreError> {
        // Probe the signals collection; an unreachable backend is a
        // connection-level failure, distinct from later query failures.
        let probe = self
            .signals
            .client
            .get(self.signals.collection_url())
            .header(API_KEY_HEADER, &self.signals.config.api_key)
            .query(&[("limit", "1")])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let existing: Vec<serde_json::Value> = probe
            .json()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        if existing.is_empty() {
            info!("remote store: seeding demo data");
            for signal in seed::demo_signals() {
                if let Err(e) = self.signals.put(&signal).await {
                    warn!(error = %e, "remote seed write failed");
                }
            }
            for ad in seed::demo_ads() {
                if let Err(e) = self.ads.put(&ad).await {
                    warn!(error = %e, "remote seed write failed");
                }
            }
        }
        Ok(())
    }

    fn signals(&self) -> &dyn Collection<TradingSignal> {
        &self.signals
    }

    fn ads(&self) -> &dyn Collection<Ad> {
        &self.ads
    }
}
