//! String-list settings store.
//!
//! Settings live in one JSON object (`key -> [string]`). Every `set_strv`
//! rewrites the whole file through a temp file + rename, so a crash mid-write
//! never leaves a truncated store behind.
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::config_dir;
use crate::config::constants::SETTINGS_FILE;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings io error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("settings file {} is not a string-list map: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Key-value store of string lists.
pub trait SettingsStore {
    fn get_strv(&self, key: &str) -> Result<Vec<String>, SettingsError>;
    fn set_strv(&mut self, key: &str, values: &[String]) -> Result<(), SettingsError>;
}

type StrvMap = BTreeMap<String, Vec<String>>;

pub struct JsonSettings {
    path: PathBuf,
}

impl JsonSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<config dir>/spyglass/settings.json`.
    pub fn open_default() -> Self {
        Self::new(config_dir().join(SETTINGS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<StrvMap, SettingsError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(StrvMap::new()),
            Err(source) => return Err(SettingsError::Io { path: self.path.clone(), source }),
        };
        serde_json::from_str(&json).map_err(|source| SettingsError::Parse { path: self.path.clone(), source })
    }

    fn write_map(&self, map: &StrvMap) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io { path: self.path.clone(), source };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_vec_pretty(map)
            .map_err(|source| SettingsError::Parse { path: self.path.clone(), source })?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

impl SettingsStore for JsonSettings {
    fn get_strv(&self, key: &str) -> Result<Vec<String>, SettingsError> {
        Ok(self.read_map()?.remove(key).unwrap_or_default())
    }

    fn set_strv(&mut self, key: &str, values: &[String]) -> Result<(), SettingsError> {
        // An unparseable store is replaced rather than blocking every write
        let mut map = match self.read_map() {
            Ok(m) => m,
            Err(e @ SettingsError::Parse { .. }) => {
                tracing::warn!(error = %e, "replacing unreadable settings file");
                StrvMap::new()
            }
            Err(e) => return Err(e),
        };
        map.insert(key.to_string(), values.to_vec());
        self.write_map(&map)
    }
}

/// In-memory store, for tests and for sessions without a writable config dir.
#[derive(Debug, Default, Clone)]
pub struct MemorySettings {
    map: StrvMap,
}

impl SettingsStore for MemorySettings {
    fn get_strv(&self, key: &str) -> Result<Vec<String>, SettingsError> {
        Ok(self.map.get(key).cloned().unwrap_or_default())
    }

    fn set_strv(&mut self, key: &str, values: &[String]) -> Result<(), SettingsError> {
        self.map.insert(key.to_string(), values.to_vec());
        Ok(())
    }
}
