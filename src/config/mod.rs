//! Configuration document handling
//!
//! The configuration lives in `.ara/config.json` as a single JSON object. It is
//! read in full on every operation and written back in full after every
//! mutation. There is no locking and no write-to-temp-then-rename: concurrent
//! writers race (last writer wins) and a crash mid-write leaves a truncated
//! file, which the next read reports as [`Error::CorruptConfig`].

pub mod dotted;
mod types;

pub use types::{Config, PlatformRule, QualityThreshold, VersionInfo};

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::common::{Error, Result};

/// Loads and persists the configuration document
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write an empty document (`{}`), replacing any existing file
    pub fn create_empty(&self) -> Result<()> {
        self.save_document(&Map::new())
    }

    /// Load the document into the typed configuration
    pub fn load(&self) -> Result<Config> {
        let doc = self.load_document()?;
        serde_json::from_value(Value::Object(doc))
            .map_err(|e| Error::corrupt_config(&self.path, e))
    }

    /// Load the document as a generic JSON object
    pub fn load_document(&self) -> Result<Map<String, Value>> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::corrupt_config(&self.path, e))?;
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(doc)) => Ok(doc),
            Ok(_) => Err(Error::corrupt_config(
                &self.path,
                "top-level value is not an object",
            )),
            Err(e) => Err(Error::corrupt_config(&self.path, e)),
        }
    }

    /// Render the whole document as indented JSON
    ///
    /// The document must also load as a typed [`Config`].
    pub fn list(&self) -> Result<String> {
        let doc = self.load_document()?;
        serde_json::from_value::<Config>(Value::Object(doc.clone()))
            .map_err(|e| Error::corrupt_config(&self.path, e))?;
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    /// Value stored at a dotted key path
    pub fn get(&self, key_path: &str) -> Result<Value> {
        let doc = self.load_document()?;
        dotted::get_path(&doc, key_path)?
            .cloned()
            .ok_or_else(|| Error::KeyNotFound(key_path.to_string()))
    }

    /// Set the value at a dotted key path and persist the document
    ///
    /// `raw` is interpreted by [`dotted::parse_value`]. Returns the value as
    /// stored. On error the file is left untouched.
    pub fn set(&self, key_path: &str, raw: &str) -> Result<Value> {
        let mut doc = self.load_document()?;
        let value = dotted::parse_value(raw);
        dotted::set_path(&mut doc, key_path, value.clone())?;
        self.save_document(&doc)?;
        tracing::debug!(key = key_path, value = %value, "configuration updated");
        Ok(value)
    }

    /// Overwrite the backing file with `doc`
    fn save_document(&self, doc: &Map<String, Value>) -> Result<()> {
        let mut content = serde_json::to_string_pretty(doc)?;
        content.push('\n');
        std::fs::write(&self.path, content).map_err(|e| Error::unwritable(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn store_in(dir: &Path) -> ConfigStore {
        let store = ConfigStore::new(dir.join("config.json"));
        store.create_empty().unwrap();
        store
    }

    #[test]
    fn test_list_empty_document() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        assert_eq!(store.list().unwrap(), "{}");
    }

    #[test]
    fn test_set_then_read_back() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        assert_eq!(store.set("thresholds.unit.failure", "95").unwrap(), json!(95));
        store.set("project", "the-demo-project").unwrap();
        store.set("version", r#"{"name":"v3","millis":1581908400000}"#).unwrap();

        let doc = store.load_document().unwrap();
        assert_eq!(
            Value::Object(doc),
            json!({
                "thresholds": {"unit": {"failure": 95}},
                "project": "the-demo-project",
                "version": {"name": "v3", "millis": 1581908400000u64}
            })
        );

        let config = store.load().unwrap();
        assert_eq!(config.version_millis(), Some(1581908400000));
        assert_eq!(config.thresholds["unit"].failure, Some(95));
    }

    #[test]
    fn test_set_null_stores_literal_string() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        store.set("cycle", "null").unwrap();
        assert_eq!(store.get("cycle").unwrap(), json!("null"));
    }

    #[test]
    fn test_type_conflict_leaves_file_identical() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        store.set("project", "demo").unwrap();
        let before = std::fs::read(store.path()).unwrap();

        let err = store.set("project.code", "x").unwrap_err();
        assert!(matches!(err, Error::TypeConflict { .. }));

        let after = std::fs::read(store.path()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_get_missing_key() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        assert!(matches!(store.get("server"), Err(Error::KeyNotFound(_))));
    }

    #[test]
    fn test_missing_file_is_corrupt() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("absent.json"));
        assert!(matches!(store.load(), Err(Error::CorruptConfig { .. })));
        assert!(matches!(store.list(), Err(Error::CorruptConfig { .. })));
    }

    #[test]
    fn test_invalid_json_is_corrupt() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));
        std::fs::write(store.path(), "{\"project\": ").unwrap();
        assert!(matches!(store.load_document(), Err(Error::CorruptConfig { .. })));

        std::fs::write(store.path(), "[1, 2]").unwrap();
        assert!(matches!(store.load_document(), Err(Error::CorruptConfig { .. })));
    }

    #[test]
    fn test_wrong_shape_fails_typed_load_only() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        store.set("version.millis", "tomorrow").unwrap();

        assert!(store.load_document().is_ok());
        assert!(matches!(store.load(), Err(Error::CorruptConfig { .. })));
        assert!(matches!(store.list(), Err(Error::CorruptConfig { .. })));
    }

    #[test]
    fn test_list_keeps_unknown_keys() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        store.set("custom.flag", "true").unwrap();
        let listed: Value = serde_json::from_str(&store.list().unwrap()).unwrap();
        assert_eq!(listed, json!({"custom": {"flag": true}}));
    }
}
