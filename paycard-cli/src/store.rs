//! File-backed order identifier store.
//!
//! The file holds a flat JSON object of string entries. Entries are
//! JSON-encoded before being stored, so a cleared order identifier is kept as
//! the two-character string `""` rather than being removed.

use paycard_core::store::{ORDER_ID_KEY, OrderIdStore, StoreError};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The decoded order identifier, `None` if never written.
    pub fn order_id(&self) -> Result<Option<String>, StoreError> {
        let entries = self.read_entries()?;
        match entries.get(ORDER_ID_KEY) {
            Some(Value::String(encoded)) => Ok(Some(serde_json::from_str(encoded)?)),
            _ => Ok(None),
        }
    }

    fn read_entries(&self) -> Result<Map<String, Value>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(Map::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(entries)?;

        // Write atomically: write to temp file, then rename
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, json)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl OrderIdStore for JsonFileStore {
    fn set_order_id(&mut self, order_id: &str) -> Result<(), StoreError> {
        let mut entries = self.read_entries()?;
        entries.insert(
            ORDER_ID_KEY.to_string(),
            Value::String(serde_json::to_string(order_id)?),
        );
        self.write_entries(&entries)?;
        tracing::debug!(path = %self.path.display(), %order_id, "Order id persisted");
        Ok(())
    }
}
