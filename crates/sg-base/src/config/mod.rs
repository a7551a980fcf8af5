//! YAML configuration for the resident controller.
//!
//! Every field carries a serde default so a missing or partial `config.yaml`
//! still yields a complete [`AppConfig`].
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

pub mod constants;

use constants::{APP_DIR, CONFIG_FILE, DEFAULT_DEBOUNCE_MS, DEFAULT_RPC_TIMEOUT_MS, MIN_DEBOUNCE_MS, MIN_RPC_TIMEOUT_MS};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// A file offered by the "add file watch" prompt.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WatchPreset {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub debounce_ms: u64,
    pub rpc_timeout_ms: u64,
    pub log_filter: String,
    pub watch_presets: Vec<WatchPreset>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            rpc_timeout_ms: DEFAULT_RPC_TIMEOUT_MS,
            log_filter: "info".to_string(),
            watch_presets: vec![WatchPreset {
                name: ".xsession-errors".to_string(),
                path: "~/.xsession-errors".to_string(),
            }],
        }
    }
}

impl AppConfig {
    /// Coalescing window for file refreshes, never shorter than `MIN_DEBOUNCE_MS`.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms.max(MIN_DEBOUNCE_MS))
    }

    /// Remote call timeout, never shorter than `MIN_RPC_TIMEOUT_MS`. Socket
    /// timeouts reject a zero duration.
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_millis(self.rpc_timeout_ms.max(MIN_RPC_TIMEOUT_MS))
    }
}

/// Per-user config directory (`~/.config/spyglass` on Linux).
pub fn config_dir() -> PathBuf {
    dirs::config_dir().unwrap_or_else(std::env::temp_dir).join(APP_DIR)
}

/// Per-user state directory for logs. Falls back to the local data dir on
/// platforms without a state dir.
pub fn state_dir() -> PathBuf {
    dirs::state_dir().or_else(dirs::data_local_dir).unwrap_or_else(std::env::temp_dir).join(APP_DIR)
}

/// Load `config.yaml` from the config dir. A missing file is not an error.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_dir().join(CONFIG_FILE))
}

pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(source) => return Err(ConfigError::Io { path: path.to_path_buf(), source }),
    };
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(path));
    }
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}
