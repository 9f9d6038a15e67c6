use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf, time::Duration};

use crate::provider::ProviderId;

/// Default minimum time the loading indicator stays visible.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 500;

/// Configuration for a single provider endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub base_url: String,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Milliseconds to hold the loading state before rendering.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Optional per-request timeout. Absent means requests may wait forever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Example TOML:
    /// [providers.restcountries]
    /// base_url = "https://restcountries.com/v3.1"
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_settle_delay_ms() -> u64 {
    DEFAULT_SETTLE_DELAY_MS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            request_timeout_secs: None,
            providers: HashMap::new(),
        }
    }
}

impl Config {
    /// Base URL for a provider, falling back to its public endpoint.
    pub fn base_url(&self, id: ProviderId) -> &str {
        self.providers
            .get(id.as_str())
            .map(|cfg| cfg.base_url.as_str())
            .unwrap_or_else(|| id.default_base_url())
    }

    /// Override the base URL of a provider.
    pub fn set_base_url(&mut self, id: ProviderId, base_url: String) {
        let base_url = base_url.trim_end_matches('/').to_string();
        self.providers.insert(id.as_str().to_string(), ProviderConfig { base_url });
    }

    pub fn has_override(&self, id: ProviderId) -> bool {
        self.providers.contains_key(id.as_str())
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;

        for key in cfg.providers.keys() {
            ProviderId::try_from(key.as_str())?;
        }

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "country-info", "country-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
