//! Key-value settings that live outside the goal table.

use std::fs;
use std::path::PathBuf;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::GoalsError;

pub const CURRENT_INDEX_KEY: &str = "currentGoalIndex";

/// Persists which goal is on screen across restarts.
pub trait SelectionStore {
    /// The stored index, or `None` if nothing usable is stored.
    fn load_index(&self) -> Option<usize>;

    fn save_index(&mut self, index: usize) -> Result<(), GoalsError>;
}

/// JSON object file of string values, e.g. `{ "currentGoalIndex": "2" }`.
pub struct JsonSettings {
    path: PathBuf,
}

impl JsonSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Map<String, Value> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| serde_json::from_str::<Value>(&content).ok())
            .and_then(|value| match value {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.read().get(key).and_then(Value::as_str).map(str::to_string)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), GoalsError> {
        let mut settings = self.read();
        settings.insert(key.to_string(), Value::String(value.to_string()));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(GoalsError::storage_write)?;
        }
        let content =
            serde_json::to_string_pretty(&Value::Object(settings)).map_err(GoalsError::storage_write)?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content).map_err(GoalsError::storage_write)?;
        fs::rename(&temp_path, &self.path).map_err(GoalsError::storage_write)?;
        debug!(key, value, "saved setting");
        Ok(())
    }
}

impl SelectionStore for JsonSettings {
    fn load_index(&self) -> Option<usize> {
        self.get(CURRENT_INDEX_KEY)?.trim().parse().ok()
    }

    fn save_index(&mut self, index: usize) -> Result<(), GoalsError> {
        self.set(CURRENT_INDEX_KEY, &index.to_string())
    }
}

/// Process-local selection, for tests and for running without a data directory.
#[derive(Debug, Default)]
pub struct MemorySettings {
    index: Option<usize>,
    saves: usize,
}

impl MemorySettings {
    pub fn with_index(index: usize) -> Self {
        Self {
            index: Some(index),
            saves: 0,
        }
    }

    /// Number of successful `save_index` calls.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl SelectionStore for MemorySettings {
    fn load_index(&self) -> Option<usize> {
        self.index
    }

    fn save_index(&mut self, index: usize) -> Result<(), GoalsError> {
        self.index = Some(index);
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_settings_roundtrip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");

        let mut settings = JsonSettings::new(&path);
        assert_eq!(settings.load_index(), None);
        settings.save_index(3).unwrap();
        assert_eq!(JsonSettings::new(&path).load_index(), Some(3));

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[CURRENT_INDEX_KEY], "3");
    }

    #[test]
    fn test_json_settings_keeps_other_keys() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

        let mut settings = JsonSettings::new(&path);
        settings.save_index(1).unwrap();
        assert_eq!(settings.get("theme").as_deref(), Some("dark"));
        assert_eq!(settings.load_index(), Some(1));
    }

    #[test]
    fn test_json_settings_replaces_file_without_leftovers() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, r#"{"theme": "dark", "currentGoalIndex": "0"}"#).unwrap();
        // A temp file left by an interrupted write must not block the next one.
        fs::write(path.with_extension("json.tmp"), "{\"theme\": ").unwrap();

        let mut settings = JsonSettings::new(&path);
        settings.save_index(2).unwrap();

        let entries: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries, ["settings.json"]);
        assert_eq!(settings.get("theme").as_deref(), Some("dark"));
        assert_eq!(settings.load_index(), Some(2));
    }

    #[test]
    fn test_malformed_settings_load_as_none() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");

        fs::write(&path, "not json").unwrap();
        assert_eq!(JsonSettings::new(&path).load_index(), None);

        fs::write(&path, r#"{"currentGoalIndex": "-1"}"#).unwrap();
        assert_eq!(JsonSettings::new(&path).load_index(), None);

        fs::write(&path, r#"{"currentGoalIndex": 2}"#).unwrap();
        assert_eq!(JsonSettings::new(&path).load_index(), None);
    }

    #[test]
    fn test_memory_settings_counts_saves() {
        let mut settings = MemorySettings::default();
        settings.save_index(4).unwrap();
        assert_eq!(settings.load_index(), Some(4));
        assert_eq!(settings.save_count(), 1);
    }
}
