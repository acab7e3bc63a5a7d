//! services/notifier/src/adapters/settings.rs
//!
//! Key/value settings storage. Implements the `SettingsStore` port with a
//! JSON file on disk and with an in-memory map.

use async_trait::async_trait;
use serde_json::{Map, Number, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use trivia_core::ports::{PortError, PortResult, SettingsStore};

//=========================================================================================
// JSON File Store
//=========================================================================================

/// Settings persisted as a flat JSON object.
pub struct JsonFileSettings {
    path: PathBuf,
    // Serialises read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl JsonFileSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_map(&self) -> PortResult<Map<String, Value>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(PortError::Unexpected(e.to_string())),
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(PortError::Unexpected(format!(
                "settings file {} is not a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(PortError::Unexpected(e.to_string())),
        }
    }
}

#[async_trait]
impl SettingsStore for JsonFileSettings {
    async fn get_f64(&self, key: &str) -> PortResult<Option<f64>> {
        let map = self.read_map().await?;
        Ok(map.get(key).and_then(Value::as_f64))
    }

    async fn set_f64(&self, key: &str, value: f64) -> PortResult<()> {
        let number = Number::from_f64(value)
            .ok_or_else(|| PortError::Unexpected(format!("{value} cannot be stored as JSON")))?;

        let _guard = self.write_lock.lock().await;
        let mut map = self.read_map().await?;
        map.insert(key.to_string(), Value::Number(number));

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PortError::Unexpected(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(&Value::Object(map))
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))
    }
}

//=========================================================================================
// In-Memory Store
//=========================================================================================

/// Settings that live only as long as the process.
#[derive(Default)]
pub struct MemorySettings {
    values: Mutex<HashMap<String, f64>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: f64) -> Self {
        let mut values = HashMap::new();
        values.insert(key.to_string(), value);
        Self {
            values: Mutex::new(values),
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettings {
    async fn get_f64(&self, key: &str) -> PortResult<Option<f64>> {
        Ok(self.values.lock().await.get(key).copied())
    }

    async fn set_f64(&self, key: &str, value: f64) -> PortResult<()> {
        self.values.lock().await.insert(key.to_string(), value);
        Ok(())
    }
}
