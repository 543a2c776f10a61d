//! Backend selection
//!
//! The backend is chosen exactly once at process start from explicit
//! configuration. Remote wins only when its settings are present and not
//! placeholders; everything else falls back to the offline local store.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::local::LocalStore;
use crate::remote::{RemoteConfig, RemoteStore};
use crate::store::Store;

const PLACEHOLDER_MARKERS: [&str; 3] = ["YOUR_", "changeme", "example.com"];

/// True when the remote settings look usable rather than scaffold defaults
pub fn is_remote_configured(config: Option<&RemoteConfig>) -> bool {
    let Some(config) = config else {
        return false;
    };
    if config.base_url.trim().is_empty() || config.api_key.trim().is_empty() {
        return false;
    }
    !PLACEHOLDER_MARKERS
        .iter()
        .any(|m| config.base_url.contains(m) || config.api_key.contains(m))
}

/// Pick the backend for this process
pub fn select_store(remote: Option<RemoteConfig>, data_dir: &Path) -> Arc<dyn Store> {
    match remote.filter(|c| is_remote_configured(Some(c))) {
        Some(config) => {
            info!(url = %config.base_url, "using remote document store");
            Arc::new(RemoteStore::new(config))
        }
        None => {
            info!(dir = %data_dir.display(), "using local store");
            Arc::new(LocalStore::new(data_dir))
        }
    }
}
