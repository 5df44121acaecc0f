use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

fn default_refresh_interval() -> u64 {
    5
}

fn default_total_messages() -> u64 {
    1337
}

fn default_active_connections() -> u64 {
    42
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashConfig {
    /// Seconds between "last update" refreshes
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// Footer counter: total intercepted messages
    #[serde(default = "default_total_messages")]
    pub total_messages: u64,

    /// Footer counter: active connections
    #[serde(default = "default_active_connections")]
    pub active_connections: u64,

    /// Feed selected at startup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_feed: Option<String>,

    /// Pick up colors from the system terminal theme
    #[serde(default = "default_true")]
    pub use_system_theme: bool,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval(),
            total_messages: default_total_messages(),
            active_connections: default_active_connections(),
            default_feed: None,
            use_system_theme: true,
        }
    }
}

impl DashConfig {
    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("intercept-dash");

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from the default location, falling back to defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_from(&path),
            Err(e) => {
                tracing::warn!("{}; using default config", e);
                Self::default()
            }
        }
    }

    /// Load config from a file. Missing or malformed files yield defaults;
    /// the file is never created or rewritten.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::parse(&content) {
                Ok(config) => return config,
                Err(e) => tracing::warn!("Failed to parse config {}: {}", path.display(), e),
            },
            Err(e) => tracing::warn!("Failed to read config {}: {}", path.display(), e),
        }

        Self::default()
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut config: DashConfig = toml::from_str(content)?;
        if config.refresh_interval_secs == 0 {
            tracing::warn!("refresh_interval_secs = 0 is not allowed, using 1");
            config.refresh_interval_secs = 1;
        }
        Ok(config)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }
}
