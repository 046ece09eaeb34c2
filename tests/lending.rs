//! Borrow/return lifecycle against the seeded in-memory store.
//!
//! Seed data gives user id 2 ("Regular User") and book id 1 with 5 copies.

use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use std::sync::Arc;
use tourbook::domain::error::Error;
use tourbook::domain::model::{TransactionKind, TransactionStatus};
use tourbook::storage::seed;
use tourbook::{Clock, FixedClock, LendingService, MemoryBackend, RecordStore};

const USER: i64 = 2;
const BOOK: i64 = 1;

async fn seeded() -> (RecordStore, LendingService, chrono::DateTime<Utc>) {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(now));
    let store = RecordStore::new(Arc::new(MemoryBackend::new()), clock.clone());
    seed::initialize_data(&store).await.unwrap();
    let lending = LendingService::new(store.clone(), clock);
    (store, lending, now)
}

async fn available(store: &RecordStore, book_id: i64) -> i64 {
    let mut predicate = serde_json::Map::new();
    predicate.insert("id".to_string(), json!(book_id));
    store
        .find_one("books", &predicate)
        .await
        .unwrap()
        .unwrap()["available"]
        .as_i64()
        .unwrap()
}

#[tokio::test]
async fn borrow_creates_transaction_and_mirrors_state() {
    let (store, lending, now) = seeded().await;

    let loan = lending.borrow(USER, BOOK).await.unwrap();
    assert_eq!(loan.kind, TransactionKind::Borrow);
    assert_eq!(loan.status, TransactionStatus::Active);
    assert_eq!(loan.due_date, now + Duration::days(14));
    assert_eq!(loan.book.as_ref().unwrap().available, 4);
    let user = loan.user.as_ref().unwrap();
    assert_eq!(user.borrowed_books.len(), 1);
    assert_eq!(user.borrowed_books[0].book, BOOK);

    assert_eq!(available(&store, BOOK).await, 4);
    assert_eq!(store.read_all("transactions").await.unwrap().len(), 1);

    // The per-user listing joins the book but not the user.
    let history = lending.transactions_for_user(USER).await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].book.is_some());
    assert!(history[0].user.is_none());
}

#[tokio::test]
async fn borrow_with_no_copies_fails_and_changes_nothing() {
    let (store, lending, _) = seeded().await;
    let mut patch = serde_json::Map::new();
    patch.insert("available".to_string(), json!(0));
    store.update("books", BOOK, patch).await.unwrap();

    let err = lending.borrow(USER, BOOK).await.unwrap_err();
    assert!(matches!(err, Error::Unavailable(_)));

    assert_eq!(available(&store, BOOK).await, 0);
    assert!(store.read_all("transactions").await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_active_borrow_is_a_conflict_with_no_writes() {
    let (store, lending, _) = seeded().await;
    lending.borrow(USER, BOOK).await.unwrap();

    let err = lending.borrow(USER, BOOK).await.unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    // First borrow's state is intact; nothing extra was written.
    assert_eq!(available(&store, BOOK).await, 4);
    assert_eq!(store.read_all("transactions").await.unwrap().len(), 1);
    let profile_view = lending.transactions_for_user(USER).await.unwrap();
    assert_eq!(profile_view.len(), 1);
}

#[tokio::test]
async fn borrow_then_return_round_trips() {
    let (store, lending, now) = seeded().await;
    let before = available(&store, BOOK).await;

    lending.borrow(USER, BOOK).await.unwrap();
    let closed = lending.return_book(USER, BOOK).await.unwrap();

    assert_eq!(closed.kind, TransactionKind::Return);
    assert_eq!(closed.status, TransactionStatus::Returned);
    assert_eq!(closed.return_date, Some(now));
    assert_eq!(available(&store, BOOK).await, before);
    assert!(closed.user.unwrap().borrowed_books.is_empty());
}

#[tokio::test]
async fn borrowing_an_unknown_book_is_not_found() {
    let (_, lending, _) = seeded().await;
    let err = lending.borrow(USER, 9999).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn returning_without_an_active_loan_is_not_found() {
    let (_, lending, _) = seeded().await;
    let err = lending.return_book(USER, BOOK).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn user_cannot_hold_two_loans_of_one_book_but_two_users_can() {
    let (store, lending, _) = seeded().await;
    lending.borrow(USER, BOOK).await.unwrap();
    // User id 1 is the seeded admin; admins borrow like anyone else.
    lending.borrow(1, BOOK).await.unwrap();

    assert_eq!(available(&store, BOOK).await, 3);
    let all = lending.all_transactions().await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|t| t.status == TransactionStatus::Active));
    assert!(all.iter().all(|t| t.book.is_some() && t.user.is_some()));
}
