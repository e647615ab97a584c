//! JSON-backed settings store

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use cadenza_core::{
    PersistentSettings, PlayMode, SettingsResult, DEFAULT_PLAY_MODE, DEFAULT_VOLUME,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{SETTING_PLAY_MODE, SETTING_VOLUME};

/// Key-value settings with JSON values
///
/// In-memory stores forget everything on drop. File-backed stores load the
/// file once on open and rewrite it after each successful set.
#[derive(Debug)]
pub struct JsonSettings {
    path: Option<PathBuf>,
    values: Mutex<Map<String, Value>>,
}

impl JsonSettings {
    /// A store that never touches the filesystem
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: Mutex::new(Map::new()),
        }
    }

    /// Open a file-backed store, starting empty if the file does not exist.
    ///
    /// A file that is not a JSON object is treated as empty and will be
    /// overwritten by the next set.
    pub fn open(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Map<String, Value>>(&contents) {
                Ok(values) => values,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Ignoring unreadable settings file"
                    );
                    Map::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), keys = values.len(), "Opened settings file");

        Ok(Self {
            path: Some(path),
            values: Mutex::new(values),
        })
    }

    /// Path of the backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Raw JSON value stored under `key`
    pub fn get_raw(&self, key: &str) -> Option<Value> {
        self.values().get(key).cloned()
    }

    /// Typed value stored under `key`.
    ///
    /// Missing and unparsable values both yield `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get_raw(key)?;
        match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!(key, error = %e, "Stored setting has unexpected shape");
                None
            }
        }
    }

    /// Store `value` under `key` and flush to disk when file-backed.
    ///
    /// The in-memory value only changes once the file write succeeded.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> SettingsResult<()> {
        let value = serde_json::to_value(value)?;
        let mut values = self.values();
        let mut updated = values.clone();
        updated.insert(key.to_string(), value);
        self.flush(&updated)?;
        *values = updated;
        Ok(())
    }

    /// Remove `key`, returning its previous value
    pub fn remove(&self, key: &str) -> SettingsResult<Option<Value>> {
        let mut values = self.values();
        if !values.contains_key(key) {
            return Ok(None);
        }
        let mut updated = values.clone();
        let previous = updated.remove(key);
        self.flush(&updated)?;
        *values = updated;
        Ok(previous)
    }

    fn values(&self) -> MutexGuard<'_, Map<String, Value>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn flush(&self, values: &Map<String, Value>) -> SettingsResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(values)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

impl Default for JsonSettings {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl PersistentSettings for JsonSettings {
    fn volume(&self) -> f32 {
        self.get::<f32>(SETTING_VOLUME)
            .filter(|v| v.is_finite())
            .map_or(DEFAULT_VOLUME, |v| v.clamp(0.0, 1.0))
    }

    fn set_volume(&self, volume: f32) -> SettingsResult<()> {
        self.set(SETTING_VOLUME, &volume)
    }

    fn play_mode(&self) -> PlayMode {
        self.get::<PlayMode>(SETTING_PLAY_MODE)
            .unwrap_or(DEFAULT_PLAY_MODE)
    }

    fn set_play_mode(&self, mode: PlayMode) -> SettingsResult<()> {
        self.set(SETTING_PLAY_MODE, &mode)
    }
}
