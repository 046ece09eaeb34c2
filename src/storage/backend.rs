//! Persistence substrate behind the record store.
//!
//! One implementation per backing store: a JSON document on disk per
//! collection, or an in-memory map for tests. Both hand the record store a
//! whole collection at a time; the store does every mutation as a
//! read-modify-write of the full array, exactly like the original flat-file
//! database.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;

use crate::domain::error::StorageError;

#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Loads the full collection. A collection that was never written reads
    /// as an empty array (first-use bootstrap), never as an error.
    async fn load(&self, collection: &str) -> Result<Vec<JsonValue>, StorageError>;

    /// Replaces the full collection.
    async fn persist(
        &self,
        collection: &str,
        records: &[JsonValue],
    ) -> Result<(), StorageError>;
}

/// One `<data_dir>/<collection>.json` document per collection, pretty-printed
/// with two-space indents like the documents the original service wrote.
pub struct JsonFileBackend {
    data_dir: PathBuf,
}

impl JsonFileBackend {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    fn path_for(&self, collection: &str) -> PathBuf {
        self.data_dir.join(format!("{collection}.json"))
    }
}

#[async_trait]
impl DocumentBackend for JsonFileBackend {
    async fn load(&self, collection: &str) -> Result<Vec<JsonValue>, StorageError> {
        let raw = match tokio::fs::read_to_string(self.path_for(collection)).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StorageError::Read { collection: collection.to_string(), source: e })
            }
        };

        let parsed: JsonValue = serde_json::from_str(&raw).map_err(|e| {
            StorageError::Malformed { collection: collection.to_string(), source: e }
        })?;
        match parsed {
            JsonValue::Array(records) => Ok(records),
            _ => Err(StorageError::NotAnArray { collection: collection.to_string() }),
        }
    }

    async fn persist(
        &self,
        collection: &str,
        records: &[JsonValue],
    ) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.data_dir).await.map_err(|e| {
            StorageError::Write { collection: collection.to_string(), source: e }
        })?;
        // serde_json's pretty printer uses two-space indents.
        let body = serde_json::to_string_pretty(records).map_err(|e| {
            StorageError::BadRecord { collection: collection.to_string(), source: e }
        })?;
        tokio::fs::write(self.path_for(collection), body).await.map_err(|e| {
            StorageError::Write { collection: collection.to_string(), source: e }
        })
    }
}

/// In-memory backend for tests.
#[derive(Default)]
pub struct MemoryBackend {
    collections: RwLock<HashMap<String, Vec<JsonValue>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentBackend for MemoryBackend {
    async fn load(&self, collection: &str) -> Result<Vec<JsonValue>, StorageError> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn persist(
        &self,
        collection: &str,
        records: &[JsonValue],
    ) -> Result<(), StorageError> {
        self.collections
            .write()
            .await
            .insert(collection.to_string(), records.to_vec());
        Ok(())
    }
}
