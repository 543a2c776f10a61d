//! Device-scoped preferences persistence
//!
//! One JSON file, independent of the signal/ad backend choice: preferences
//! never sync remotely. Loaded once at startup, defaulted when absent or
//! corrupt, saved on every change.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use common::{StoreError, UserPreferences};
use tokio::fs;
use tracing::warn;

const PREFS_FILE: &str = "preferences.json";

/// JSON-file store for `UserPreferences`
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(PREFS_FILE),
        }
    }

    /// Load saved preferences, falling back to defaults when the file is
    /// missing or unreadable. A corrupt file is not an error.
    pub async fn load(&self) -> UserPreferences {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    warn!(error = %e, "failed to read preferences, using defaults");
                }
                return UserPreferences::default();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(prefs) => prefs,
            Err(e) => {
                warn!(error = %e, "corrupt preferences file, using defaults");
                UserPreferences::default()
            }
        }
    }

    pub async fn save(&self, prefs: &UserPreferences) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(prefs)?;
        fs::write(&self.path, bytes).await?;
        Ok(())
    }
}
