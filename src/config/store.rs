//! Persistent settings store.
//!
//! Everything lives under one key, `thecircle_data`, holding
//! `{config, selectionMenuItems, globalMenuItems}`. A missing key means
//! first run and yields the built-in defaults. Writes replace the whole
//! object (last writer wins).
//!
//! Backends:
//!   - MemoryStorage — process-local map, used by tests and one-shot runs
//!   - FileStorage   — a JSON file under the platform config dir

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::menu::{default_global_menu, default_selection_menu, MenuContext, MenuItem};
use super::{ConfigPatch, Configuration};

pub const STORAGE_KEY: &str = "thecircle_data";

/// Env var overriding the storage file location.
pub const STORAGE_PATH_ENV: &str = "CIRCLE_STORAGE_PATH";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize storage data: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Async key-value storage, shaped like the browser's local storage area.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
}

// ── Backends ───────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.lock().await.insert(key.to_string(), value);
        Ok(())
    }
}

/// All keys in one pretty-printed JSON file.
///
/// Reads tolerate a missing or corrupt file (treated as empty). Writes
/// go through a lock so two saves from one process don't interleave.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// `$CIRCLE_STORAGE_PATH`, else `<config dir>/the-circle/storage.json`.
    pub fn default_location() -> Result<Self, StoreError> {
        if let Ok(p) = std::env::var(STORAGE_PATH_ENV) {
            if !p.is_empty() {
                return Ok(Self::new(p));
            }
        }
        let dir = crate::app_config_dir()
            .ok_or_else(|| StoreError::Unavailable("Could not determine config directory".into()))?;
        Ok(Self::new(dir.join("storage.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_all(&self) -> Result<HashMap<String, Value>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(map) => Ok(map),
                Err(e) => {
                    log::warn!(
                        "[STORE] Ignoring unreadable storage file {}: {}",
                        self.path.display(),
                        e
                    );
                    Ok(HashMap::new())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_all(&self, map: &HashMap<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(map)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.load_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.load_all().await?;
        map.insert(key.to_string(), value);
        self.write_all(&map).await?;
        log::info!("[STORE] Saved '{}' to {}", key, self.path.display());
        Ok(())
    }
}

// ── Stored object ──────────────────────────────────────────────────

/// Everything persisted under `STORAGE_KEY`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageData {
    #[serde(default)]
    pub config: Configuration,
    #[serde(default = "default_selection_menu")]
    pub selection_menu_items: Vec<MenuItem>,
    #[serde(default = "default_global_menu")]
    pub global_menu_items: Vec<MenuItem>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            config: Configuration::default(),
            selection_menu_items: default_selection_menu(),
            global_menu_items: default_global_menu(),
        }
    }
}

impl StorageData {
    /// Decode a stored blob section by section.
    ///
    /// A bad config field or a bad menu item is dropped on its own, so
    /// one unknown action can't wipe the key and the other items.
    pub fn from_stored(value: Value) -> Self {
        let mut sections = match value {
            Value::Object(sections) => sections,
            other => {
                log::error!("[STORE] Stored data is not an object, using defaults: {}", other);
                return Self::default();
            }
        };
        let defaults = Self::default();
        Self {
            config: sections
                .remove("config")
                .map(decode_config)
                .unwrap_or(defaults.config),
            selection_menu_items: sections
                .remove("selectionMenuItems")
                .and_then(|raw| decode_menu("selectionMenuItems", raw))
                .unwrap_or(defaults.selection_menu_items),
            global_menu_items: sections
                .remove("globalMenuItems")
                .and_then(|raw| decode_menu("globalMenuItems", raw))
                .unwrap_or(defaults.global_menu_items),
        }
    }

    pub fn menu(&self, context: MenuContext) -> &[MenuItem] {
        match context {
            MenuContext::Selection => &self.selection_menu_items,
            MenuContext::Global => &self.global_menu_items,
        }
    }
}

fn decode_config(raw: Value) -> Configuration {
    let Value::Object(fields) = raw else {
        log::error!("[STORE] Stored config is not an object, using defaults");
        return Configuration::default();
    };
    // Every field has a default, so each one can be checked alone.
    let valid: serde_json::Map<String, Value> = fields
        .into_iter()
        .filter(|(name, value)| {
            let single = Value::Object([(name.clone(), value.clone())].into_iter().collect());
            match serde_json::from_value::<Configuration>(single) {
                Ok(_) => true,
                Err(e) => {
                    log::error!("[STORE] Dropping invalid config field '{}': {}", name, e);
                    false
                }
            }
        })
        .collect();
    serde_json::from_value(Value::Object(valid)).unwrap_or_else(|e| {
        log::error!("[STORE] Stored config is invalid, using defaults: {}", e);
        Configuration::default()
    })
}

/// `None` when the section is not a list at all.
fn decode_menu(section: &str, raw: Value) -> Option<Vec<MenuItem>> {
    let entries = match raw {
        Value::Array(entries) => entries,
        other => {
            log::error!("[STORE] {} is not a list, using defaults: {}", section, other);
            return None;
        }
    };
    let items = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<MenuItem>(entry.clone()) {
            Ok(item) => Some(item),
            Err(e) => {
                log::error!("[STORE] Dropping invalid {} entry ({}): {}", section, e, entry);
                None
            }
        })
        .collect();
    Some(items)
}

/// Top-level sections to replace; `None` keeps the stored section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoragePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Configuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_menu_items: Option<Vec<MenuItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_menu_items: Option<Vec<MenuItem>>,
}

// ── Facade ─────────────────────────────────────────────────────────

/// Read/modify/write access to the stored settings object.
#[derive(Clone)]
pub struct ConfigStore {
    backend: Arc<dyn StorageBackend>,
}

impl ConfigStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Stored data, or the built-in defaults when nothing usable is stored.
    pub async fn get_storage_data(&self) -> Result<StorageData, StoreError> {
        let Some(value) = self.backend.get(STORAGE_KEY).await? else {
            return Ok(StorageData::default());
        };
        Ok(StorageData::from_stored(value))
    }

    pub async fn save_storage_data(&self, patch: StoragePatch) -> Result<StorageData, StoreError> {
        let mut data = self.get_storage_data().await?;
        if let Some(config) = patch.config {
            data.config = config;
        }
        if let Some(items) = patch.selection_menu_items {
            data.selection_menu_items = items;
        }
        if let Some(items) = patch.global_menu_items {
            data.global_menu_items = items;
        }
        self.backend
            .set(STORAGE_KEY, serde_json::to_value(&data)?)
            .await?;
        Ok(data)
    }

    pub async fn get_config(&self) -> Result<Configuration, StoreError> {
        Ok(self.get_storage_data().await?.config)
    }

    /// Merge `patch` into the stored config and persist the result.
    pub async fn save_config(&self, patch: ConfigPatch) -> Result<Configuration, StoreError> {
        let mut config = self.get_config().await?;
        config.merge(patch);
        let data = self
            .save_storage_data(StoragePatch {
                config: Some(config),
                ..StoragePatch::default()
            })
            .await?;
        log::info!("[SETTINGS] Config saved");
        Ok(data.config)
    }

    /// Replace the whole config with the defaults. Menus are kept.
    pub async fn reset_config(&self) -> Result<Configuration, StoreError> {
        let data = self
            .save_storage_data(StoragePatch {
                config: Some(Configuration::default()),
                ..StoragePatch::default()
            })
            .await?;
        log::info!("[SETTINGS] Config reset to defaults");
        Ok(data.config)
    }

    pub async fn get_selection_menu_items(&self) -> Result<Vec<MenuItem>, StoreError> {
        Ok(self.get_storage_data().await?.selection_menu_items)
    }

    pub async fn get_global_menu_items(&self) -> Result<Vec<MenuItem>, StoreError> {
        Ok(self.get_storage_data().await?.global_menu_items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;

    #[tokio::test]
    async fn empty_store_yields_exact_defaults() {
        let store = ConfigStore::in_memory();
        let data = store.get_storage_data().await.unwrap();
        assert_eq!(data, StorageData::default());
        assert_eq!(data.selection_menu_items, default_selection_menu());
        assert_eq!(data.global_menu_items, default_global_menu());
    }

    #[tokio::test]
    async fn save_config_merges_partial_update() {
        let store = ConfigStore::in_memory();
        store
            .save_config(ConfigPatch {
                api_key: Some("sk-keep".to_string()),
                preferred_language: Some("fr".to_string()),
                ..ConfigPatch::default()
            })
            .await
            .unwrap();

        store.save_config(ConfigPatch::theme(Theme::Dark)).await.unwrap();

        let config = store.get_config().await.unwrap();
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.api_key.as_deref(), Some("sk-keep"));
        assert_eq!(config.preferred_language, "fr");
        assert_eq!(config.shortcut.to_string(), "Alt+Tab");
    }

    #[tokio::test]
    async fn reset_restores_default_config_and_keeps_menus() {
        let store = ConfigStore::in_memory();
        let mut items = default_global_menu();
        items.truncate(2);
        store
            .save_storage_data(StoragePatch {
                global_menu_items: Some(items.clone()),
                ..StoragePatch::default()
            })
            .await
            .unwrap();
        store
            .save_config(ConfigPatch {
                api_key: Some("sk-gone".to_string()),
                theme: Some(Theme::Light),
                ..ConfigPatch::default()
            })
            .await
            .unwrap();

        let config = store.reset_config().await.unwrap();
        assert_eq!(config, Configuration::default());
        assert_eq!(store.get_global_menu_items().await.unwrap(), items);
    }

    #[tokio::test]
    async fn invalid_config_field_falls_back_to_its_default() {
        let backend = Arc::new(MemoryStorage::new());
        backend
            .set(STORAGE_KEY, serde_json::json!({"config": {"shortcut": "K"}}))
            .await
            .unwrap();
        let store = ConfigStore::new(backend);
        assert_eq!(store.get_storage_data().await.unwrap(), StorageData::default());
    }

    #[tokio::test]
    async fn bad_menu_item_is_dropped_and_the_rest_survives_a_save() {
        let mut stored = serde_json::to_value(StorageData::default()).unwrap();
        stored["config"]["apiKey"] = "sk-mine".into();
        stored["config"]["theme"] = "dark".into();
        stored["config"]["shortcut"] = "K".into();
        stored["globalMenuItems"][2]["action"] = "teleport".into();
        stored["selectionMenuItems"] = "not a list".into();

        let backend = Arc::new(MemoryStorage::new());
        backend.set(STORAGE_KEY, stored).await.unwrap();
        let store = ConfigStore::new(backend.clone());

        let data = store.get_storage_data().await.unwrap();
        assert_eq!(data.config.api_key.as_deref(), Some("sk-mine"));
        assert_eq!(data.config.theme, Theme::Dark);
        assert_eq!(data.config.shortcut.to_string(), "Alt+Tab");
        assert_eq!(data.selection_menu_items, default_selection_menu());
        let mut expected = default_global_menu();
        expected.remove(2);
        assert_eq!(data.global_menu_items, expected);

        store.save_config(ConfigPatch::theme(Theme::Light)).await.unwrap();
        let raw = backend.get(STORAGE_KEY).await.unwrap().unwrap();
        assert_eq!(raw["config"]["apiKey"], "sk-mine");
        assert_eq!(raw["globalMenuItems"].as_array().unwrap().len(), expected.len());
    }

    #[tokio::test]
    async fn non_object_blob_reads_as_defaults() {
        let backend = Arc::new(MemoryStorage::new());
        backend.set(STORAGE_KEY, Value::from("garbage")).await.unwrap();
        let store = ConfigStore::new(backend);
        assert_eq!(store.get_storage_data().await.unwrap(), StorageData::default());
    }

    #[tokio::test]
    async fn missing_sections_are_filled_from_defaults() {
        let backend = Arc::new(MemoryStorage::new());
        backend
            .set(STORAGE_KEY, serde_json::json!({"config": {"theme": "dark"}}))
            .await
            .unwrap();
        let store = ConfigStore::new(backend);
        let data = store.get_storage_data().await.unwrap();
        assert_eq!(data.config.theme, Theme::Dark);
        assert_eq!(data.config.preferred_language, "zh-CN");
        assert_eq!(data.selection_menu_items, default_selection_menu());
    }

    #[tokio::test]
    async fn file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let store = ConfigStore::new(Arc::new(FileStorage::new(&path)));
        store.save_config(ConfigPatch::theme(Theme::Light)).await.unwrap();

        let reopened = ConfigStore::new(Arc::new(FileStorage::new(&path)));
        assert_eq!(reopened.get_config().await.unwrap().theme, Theme::Light);

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[STORAGE_KEY]["config"]["theme"], "light");
    }

    #[tokio::test]
    async fn corrupt_file_reads_as_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{ not json").unwrap();

        let backend = FileStorage::new(&path);
        assert!(backend.get(STORAGE_KEY).await.unwrap().is_none());
        backend.set("other", Value::Bool(true)).await.unwrap();
        assert_eq!(backend.get("other").await.unwrap(), Some(Value::Bool(true)));
    }
}
