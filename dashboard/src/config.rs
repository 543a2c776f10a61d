//! Dashboard configuration
//!
//! Loaded once at startup from an optional TOML file, then overlaid with
//! environment variables for the secrets (`GEMINI_API_KEY`,
//! `ALPHASIGNAL_REMOTE_API_KEY`, `ALPHASIGNAL_ADMIN_SECRET`) so keys never
//! have to live on disk. A missing file means defaults: local storage,
//! no generation backend until a key is provided.

use std::path::{Path, PathBuf};
use std::time::Duration;

use generation::GeminiConfig;
use serde::Deserialize;
use storage::RemoteConfig;

use crate::session::LoadPolicy;

/// Overall dashboard configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory for the local store and preferences file
    pub data_dir: Option<PathBuf>,

    pub remote: RemoteSettings,
    pub generation: GenerationSettings,
    pub admin: AdminSettings,
    pub startup: StartupSettings,
    pub intervals: IntervalSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            remote: RemoteSettings::default(),
            generation: GenerationSettings::default(),
            admin: AdminSettings::default(),
            startup: StartupSettings::default(),
            intervals: IntervalSettings::default(),
        }
    }
}

/// Remote document store settings; both fields required for remote mode
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    pub base_url: String,
    pub api_key: String,
}

/// Completion backend settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub api_key: String,
    /// Model override; empty keeps the client default
    pub model: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: String::new(),
        }
    }
}

/// Moderation console settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminSettings {
    pub secret: String,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            secret: "admin123".to_string(),
        }
    }
}

/// Startup load behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StartupSettings {
    /// Fail startup on an unreachable backend instead of degrading
    pub strict: bool,

    /// Time box for the initial load before the session degrades (ms)
    pub load_timeout_ms: u64,
}

impl Default for StartupSettings {
    fn default() -> Self {
        Self {
            strict: false,
            load_timeout_ms: 4_000,
        }
    }
}

/// Background tick cadence
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IntervalSettings {
    /// Seconds between batched price refreshes of active signals
    pub price_refresh_secs: u64,

    /// Seconds each ad stays in a rotation slot
    pub ad_rotation_secs: u64,
}

impl Default for IntervalSettings {
    fn default() -> Self {
        Self {
            price_refresh_secs: 120,
            ad_rotation_secs: 8,
        }
    }
}

impl AppConfig {
    /// Load from a TOML file when present, then overlay secret env vars.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            self.generation.api_key = key;
        }
        if let Ok(key) = std::env::var("ALPHASIGNAL_REMOTE_API_KEY") {
            self.remote.api_key = key;
        }
        if let Ok(secret) = std::env::var("ALPHASIGNAL_ADMIN_SECRET") {
            self.admin.secret = secret;
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(storage::default_data_dir)
    }

    /// Remote settings as the storage layer's config, when both are set.
    /// Placeholder detection happens in the storage layer.
    pub fn remote_config(&self) -> Option<RemoteConfig> {
        if self.remote.base_url.is_empty() && self.remote.api_key.is_empty() {
            return None;
        }
        Some(RemoteConfig {
            base_url: self.remote.base_url.clone(),
            api_key: self.remote.api_key.clone(),
        })
    }

    pub fn gemini_config(&self) -> GeminiConfig {
        let mut config = GeminiConfig::new(self.generation.api_key.clone());
        if !self.generation.model.is_empty() {
            config.model = self.generation.model.clone();
        }
        config
    }

    pub fn load_policy(&self) -> LoadPolicy {
        if self.startup.strict {
            LoadPolicy::Strict
        } else {
            LoadPolicy::TimeBoxed(Duration::from_millis(self.startup.load_timeout_ms))
        }
    }

    pub fn price_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.intervals.price_refresh_secs)
    }

    pub fn ad_rotation_interval(&self) -> Duration {
        Duration::from_secs(self.intervals.ad_rotation_secs)
    }
}
