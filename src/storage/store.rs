//! Generic CRUD over named JSON collections.
//!
//! Every operation is a read-entire-collection / mutate-array /
//! write-entire-collection cycle. Mutating operations hold a per-collection
//! async mutex for the whole cycle, so two concurrent `create` calls against
//! the same collection can no longer mint the same id. Nothing serializes
//! ACROSS collections: multi-collection orchestrations (see
//! `domain::lending`) remain a sequence of independent cycles with no
//! rollback, preserved from the original service.

use serde::de::DeserializeOwned;
use serde_json::{Map as JsonMap, Value as JsonValue};
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;

use crate::domain::clock::Clock;
use crate::domain::error::{Error, StorageError};
use crate::storage::backend::DocumentBackend;

#[derive(Clone)]
pub struct RecordStore {
    backend: Arc<dyn DocumentBackend>,
    clock: Arc<dyn Clock>,
    write_locks: Arc<StdMutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl RecordStore {
    pub fn new(backend: Arc<dyn DocumentBackend>, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend,
            clock,
            write_locks: Arc::new(StdMutex::new(HashMap::new())),
        }
    }

    fn lock_for(&self, collection: &str) -> Arc<Mutex<()>> {
        let mut locks = self.write_locks.lock().expect("write lock map poisoned");
        locks
            .entry(collection.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Full collection, in stored order. Missing document reads as empty.
    pub async fn read_all(&self, collection: &str) -> Result<Vec<JsonValue>, Error> {
        Ok(self.backend.load(collection).await?)
    }

    /// First record whose fields all structurally equal the predicate's.
    /// The `id` field additionally matches numeric strings against integer
    /// ids, since callers routinely feed it path parameters.
    pub async fn find_one(
        &self,
        collection: &str,
        predicate: &JsonMap<String, JsonValue>,
    ) -> Result<Option<JsonValue>, Error> {
        let records = self.backend.load(collection).await?;
        Ok(records.into_iter().find(|r| matches_loose(r, predicate)))
    }

    /// All records matching the predicate by exact field equality. An empty
    /// predicate returns the whole collection. Unlike `find_one` there is no
    /// id coercion here.
    pub async fn find_all(
        &self,
        collection: &str,
        predicate: &JsonMap<String, JsonValue>,
    ) -> Result<Vec<JsonValue>, Error> {
        let records = self.backend.load(collection).await?;
        if predicate.is_empty() {
            return Ok(records);
        }
        Ok(records
            .into_iter()
            .filter(|r| predicate.iter().all(|(k, v)| r.get(k) == Some(v)))
            .collect())
    }

    /// Case-insensitive substring match; a record is included if ANY of the
    /// listed fields matches.
    pub async fn search(
        &self,
        collection: &str,
        fields: &[&str],
        term: &str,
    ) -> Result<Vec<JsonValue>, Error> {
        let needle = term.to_lowercase();
        let records = self.backend.load(collection).await?;
        Ok(records
            .into_iter()
            .filter(|r| {
                fields.iter().any(|f| match r.get(*f) {
                    Some(JsonValue::Null) | None => false,
                    Some(JsonValue::String(s)) => s.to_lowercase().contains(&needle),
                    Some(other) => other.to_string().to_lowercase().contains(&needle),
                })
            })
            .collect())
    }

    /// Appends a record with an auto-incremented integer id (`max + 1`, or 1
    /// on an empty collection) and a `createdAt` stamp from the clock. Both
    /// win over caller-supplied values of the same name.
    pub async fn create(
        &self,
        collection: &str,
        fields: JsonMap<String, JsonValue>,
    ) -> Result<JsonValue, Error> {
        let lock = self.lock_for(collection);
        let _guard = lock.lock().await;

        let mut records = self.backend.load(collection).await?;
        let max_id = records
            .iter()
            .filter_map(|r| r.get("id").and_then(JsonValue::as_i64))
            .max()
            .unwrap_or(0);

        let mut record = fields;
        record.insert("id".to_string(), JsonValue::from(max_id + 1));
        record.insert(
            "createdAt".to_string(),
            serde_json::to_value(self.clock.now()).map_err(|e| StorageError::BadRecord {
                collection: collection.to_string(),
                source: e,
            })?,
        );

        let stored = JsonValue::Object(record);
        records.push(stored.clone());
        self.backend.persist(collection, &records).await?;
        Ok(stored)
    }

    /// Merges `patch` over the record with the given id and rewrites the
    /// collection. The stored `id` is never overwritten. Returns `None` if
    /// no record has that id.
    pub async fn update(
        &self,
        collection: &str,
        id: i64,
        patch: JsonMap<String, JsonValue>,
    ) -> Result<Option<JsonValue>, Error> {
        let lock = self.lock_for(collection);
        let _guard = lock.lock().await;

        let mut records = self.backend.load(collection).await?;
        let Some(target) = records
            .iter_mut()
            .find(|r| r.get("id").and_then(JsonValue::as_i64) == Some(id))
        else {
            return Ok(None);
        };

        if let Some(obj) = target.as_object_mut() {
            for (k, v) in patch {
                if k == "id" {
                    continue;
                }
                obj.insert(k, v);
            }
        }
        let updated = target.clone();
        self.backend.persist(collection, &records).await?;
        Ok(Some(updated))
    }

    /// Removes the record with the given id and rewrites the collection.
    /// Returns the removed record, or `None` if absent.
    pub async fn delete_one(
        &self,
        collection: &str,
        id: i64,
    ) -> Result<Option<JsonValue>, Error> {
        let lock = self.lock_for(collection);
        let _guard = lock.lock().await;

        let mut records = self.backend.load(collection).await?;
        let Some(pos) = records
            .iter()
            .position(|r| r.get("id").and_then(JsonValue::as_i64) == Some(id))
        else {
            return Ok(None);
        };

        let removed = records.remove(pos);
        self.backend.persist(collection, &records).await?;
        Ok(Some(removed))
    }

    /// Decodes a stored record into a typed entity.
    pub fn decode<T: DeserializeOwned>(
        &self,
        collection: &str,
        value: JsonValue,
    ) -> Result<T, Error> {
        serde_json::from_value(value).map_err(|e| {
            Error::Storage(StorageError::BadRecord {
                collection: collection.to_string(),
                source: e,
            })
        })
    }
}

fn matches_loose(record: &JsonValue, predicate: &JsonMap<String, JsonValue>) -> bool {
    predicate.iter().all(|(key, wanted)| {
        let got = record.get(key);
        if key == "id" {
            let record_id = got.and_then(JsonValue::as_i64);
            let wanted_id = match wanted {
                JsonValue::Number(n) => n.as_i64(),
                JsonValue::String(s) => s.parse::<i64>().ok(),
                _ => None,
            };
            return record_id.is_some() && record_id == wanted_id;
        }
        got == Some(wanted)
    })
}
