//! Local backend: JSON arrays in device-scoped files
//!
//! Each collection is one file holding the entire array; every operation is
//! a whole-array read-modify-write under an internal lock. Data survives
//! restarts but never leaves the machine, so the dashboard works fully
//! offline. First-ever `init()` seeds the demo dataset and drops a marker
//! file; later inits are no-ops.

use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use common::{Ad, StoreError, TradingSignal};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::info;

use crate::seed;
use crate::store::{BackendKind, Collection, Entity, Store};

const SIGNALS_FILE: &str = "signals.json";
const ADS_FILE: &str = "ads.json";
const INIT_MARKER: &str = "initialized";

/// Platform data directory for the local store and preferences, with a
/// cwd fallback for containers without a home directory
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("alphasignal")
}

/// One JSON-array file, serialized read-modify-write
struct FileCollection<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> FileCollection<T>
where
    T: Entity + Serialize + DeserializeOwned + Clone + Send + Sync,
{
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
            _entity: PhantomData,
        }
    }

    async fn read_array(&self) -> Result<Vec<T>, StoreError> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn write_array(&self, items: &[T]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(items)?;
        fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl<T> Collection<T> for FileCollection<T>
where
    T: Entity + Serialize + DeserializeOwned + Clone + Send + Sync,
{
    async fn get_all(&self) -> Result<Vec<T>, StoreError> {
        let _guard = self.lock.lock().await;
        self.read_array().await
    }

    async fn add(&self, item: &T) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut items = self.read_array().await?;
        items.insert(0, item.clone());
        self.write_array(&items).await
    }

    async fn update(&self, item: &T) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut items = self.read_array().await?;
        if let Some(existing) = items.iter_mut().find(|i| i.id() == item.id()) {
            *existing = item.clone();
            self.write_array(&items).await?;
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut items = self.read_array().await?;
        let before = items.len();
        items.retain(|i| i.id() != id);
        if items.len() != before {
            self.write_array(&items).await?;
        }
        Ok(())
    }
}

/// File-backed store rooted at a data directory
pub struct LocalStore {
    dir: PathBuf,
    signals: FileCollection<TradingSignal>,
    ads: FileCollection<Ad>,
}

impl LocalStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        Self {
            signals: FileCollection::new(dir.join(SIGNALS_FILE)),
            ads: FileCollection::new(dir.join(ADS_FILE)),
            dir,
        }
    }
}

#[async_trait]
impl Store for LocalStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn init(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).await?;

        let marker = self.dir.join(INIT_MARKER);
        if fs::try_exists(&marker).await? {
            return Ok(());
        }

        info!(dir = %self.dir.display(), "local store: seeding demo data");
        self.signals.write_array(&seed::demo_signals()).await?;
        self.ads.write_array(&seed::demo_ads()).await?;
        fs::write(&marker, b"true").await?;
        Ok(())
    }

    fn signals(&self) -> &dyn Collection<TradingSignal> {
        &self.signals
    }

    fn ads(&self) -> &dyn Collection<Ad> {
        &self.ads
    }
}
