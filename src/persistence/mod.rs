//! Key/value string storage
//!
//! History and settings are stored as JSON strings under fixed keys. The
//! browser backs this with LocalStorage; native builds and tests use an
//! in-memory map.

use std::collections::HashMap;

use thiserror::Error;

#[cfg(target_arch = "wasm32")]
mod local_storage;

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorage;

/// Failures from a [`KeyValueStore`]
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("write to `{key}` was rejected: {reason}")]
    WriteRejected { key: String, reason: String },
    #[error("could not serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Minimal string store with get/set semantics
pub trait KeyValueStore {
    /// Read a value; `None` if missing or unreadable
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store (native builds, tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v2"));
    }

    #[test]
    fn test_error_messages() {
        let err = StoreError::WriteRejected {
            key: "gameHistory".into(),
            reason: "quota exceeded".into(),
        };
        assert_eq!(
            err.to_string(),
            "write to `gameHistory` was rejected: quota exceeded"
        );
        assert_eq!(StoreError::Unavailable.to_string(), "storage is unavailable");
    }
}
