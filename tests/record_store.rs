//! Record store properties: id assignment, patch semantics, predicate
//! matching, search, and the per-collection write serialization.

use chrono::{TimeZone, Utc};
use serde_json::{json, Map, Value as JsonValue};
use std::sync::Arc;
use tourbook::domain::error::{Error, StorageError};
use tourbook::{Clock, DocumentBackend, FixedClock, JsonFileBackend, MemoryBackend, RecordStore};

fn fields(v: JsonValue) -> Map<String, JsonValue> {
    match v {
        JsonValue::Object(m) => m,
        _ => panic!("expected object"),
    }
}

fn memory_store() -> RecordStore {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    ));
    RecordStore::new(Arc::new(MemoryBackend::new()), clock)
}

#[tokio::test]
async fn create_assigns_one_on_empty_collection() {
    let store = memory_store();
    let record = store
        .create("widgets", fields(json!({ "name": "first" })))
        .await
        .unwrap();
    assert_eq!(record["id"], json!(1));
    assert!(record["createdAt"].is_string());
}

#[tokio::test]
async fn create_increments_past_max_existing_id() {
    let backend = Arc::new(MemoryBackend::new());
    backend
        .persist("widgets", &[json!({ "id": 7, "name": "seed" })])
        .await
        .unwrap();
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(Utc::now()));
    let store = RecordStore::new(backend, clock);

    let record = store
        .create("widgets", fields(json!({ "name": "next" })))
        .await
        .unwrap();
    assert_eq!(record["id"], json!(8));
}

#[tokio::test]
async fn update_never_overwrites_id() {
    let store = memory_store();
    store
        .create("widgets", fields(json!({ "name": "keep" })))
        .await
        .unwrap();

    let updated = store
        .update("widgets", 1, fields(json!({ "id": 99, "name": "renamed" })))
        .await
        .unwrap()
        .expect("record exists");
    assert_eq!(updated["id"], json!(1));
    assert_eq!(updated["name"], json!("renamed"));
}

#[tokio::test]
async fn update_and_delete_on_missing_id_return_none() {
    let store = memory_store();
    assert!(store
        .update("widgets", 42, fields(json!({ "name": "x" })))
        .await
        .unwrap()
        .is_none());
    assert!(store.delete_one("widgets", 42).await.unwrap().is_none());
}

#[tokio::test]
async fn find_one_matches_integer_and_string_ids() {
    let store = memory_store();
    store
        .create("widgets", fields(json!({ "name": "a" })))
        .await
        .unwrap();
    store
        .create("widgets", fields(json!({ "name": "b" })))
        .await
        .unwrap();
    store
        .create("widgets", fields(json!({ "name": "c" })))
        .await
        .unwrap();

    let by_number = store
        .find_one("widgets", &fields(json!({ "id": 3 })))
        .await
        .unwrap();
    let by_string = store
        .find_one("widgets", &fields(json!({ "id": "3" })))
        .await
        .unwrap();
    assert_eq!(by_number.as_ref().unwrap()["name"], json!("c"));
    assert_eq!(by_number, by_string);
}

#[tokio::test]
async fn find_all_uses_exact_equality_without_id_coercion() {
    let store = memory_store();
    store
        .create("widgets", fields(json!({ "color": "red" })))
        .await
        .unwrap();
    store
        .create("widgets", fields(json!({ "color": "blue" })))
        .await
        .unwrap();

    let all = store.find_all("widgets", &Map::new()).await.unwrap();
    assert_eq!(all.len(), 2);

    let red = store
        .find_all("widgets", &fields(json!({ "color": "red" })))
        .await
        .unwrap();
    assert_eq!(red.len(), 1);

    // No coercion here, unlike find_one.
    let by_string_id = store
        .find_all("widgets", &fields(json!({ "id": "1" })))
        .await
        .unwrap();
    assert!(by_string_id.is_empty());
}

#[tokio::test]
async fn search_is_case_insensitive_across_fields() {
    let store = memory_store();
    store
        .create(
            "books",
            fields(json!({ "title": "1984", "author": "George Orwell" })),
        )
        .await
        .unwrap();
    store
        .create(
            "books",
            fields(json!({ "title": "Dune", "author": "Frank Herbert" })),
        )
        .await
        .unwrap();

    let hits = store
        .search("books", &["title", "author"], "orwell")
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["title"], json!("1984"));

    // Numeric fields stringify for matching, like the original.
    let numeric = store.search("books", &["title"], "1984").await.unwrap();
    assert_eq!(numeric.len(), 1);
}

#[tokio::test]
async fn create_stamps_created_at_from_the_clock() {
    let instant = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let store = RecordStore::new(
        Arc::new(MemoryBackend::new()),
        Arc::new(FixedClock(instant)),
    );
    let record = store
        .create("widgets", fields(json!({ "name": "stamped" })))
        .await
        .unwrap();
    let stored: chrono::DateTime<Utc> =
        serde_json::from_value(record["createdAt"].clone()).unwrap();
    assert_eq!(stored, instant);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_mint_distinct_ids() {
    let store = memory_store();

    let mut handles = Vec::new();
    for i in 0..10 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .create("widgets", fields(json!({ "n": i })))
                .await
                .unwrap()["id"]
                .as_i64()
                .unwrap()
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort_unstable();
    assert_eq!(ids, (1..=10).collect::<Vec<i64>>());
}

#[tokio::test]
async fn missing_document_reads_as_empty_collection() {
    let dir = std::env::temp_dir().join(format!("tourbook-empty-{}", rand_suffix()));
    let store = RecordStore::new(
        Arc::new(JsonFileBackend::new(&dir)),
        Arc::new(FixedClock(Utc::now())),
    );
    assert!(store.read_all("never_written").await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_document_is_a_storage_error() {
    let dir = std::env::temp_dir().join(format!("tourbook-bad-{}", rand_suffix()));
    tokio::fs::create_dir_all(&dir).await.unwrap();
    tokio::fs::write(dir.join("broken.json"), "{ not json")
        .await
        .unwrap();

    let store = RecordStore::new(
        Arc::new(JsonFileBackend::new(&dir)),
        Arc::new(FixedClock(Utc::now())),
    );
    let err = store.read_all("broken").await.unwrap_err();
    assert!(matches!(
        err,
        Error::Storage(StorageError::Malformed { .. })
    ));

    tokio::fs::remove_dir_all(&dir).await.ok();
}

#[tokio::test]
async fn file_backend_round_trips_records() {
    let dir = std::env::temp_dir().join(format!("tourbook-rt-{}", rand_suffix()));
    let store = RecordStore::new(
        Arc::new(JsonFileBackend::new(&dir)),
        Arc::new(FixedClock(Utc::now())),
    );

    store
        .create("widgets", fields(json!({ "name": "persisted" })))
        .await
        .unwrap();
    let removed = store.delete_one("widgets", 1).await.unwrap();
    assert_eq!(removed.unwrap()["name"], json!("persisted"));
    assert!(store.read_all("widgets").await.unwrap().is_empty());

    tokio::fs::remove_dir_all(&dir).await.ok();
}

fn rand_suffix() -> u64 {
    rand::random()
}
