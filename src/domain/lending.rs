//! Borrow/return orchestration across the `books`, `users` and
//! `transactions` collections.
//!
//! Every numbered step below is an independent read-modify-write against a
//! single collection. There is no cross-collection transaction and no
//! compensation: if a later step fails, the earlier steps stay committed.
//! That hazard is inherited from the original service and documented rather
//! than fixed. The store's per-collection lock serializes individual
//! operations (concurrent creates cannot mint duplicate ids), but it does
//! not cover values computed before an update: the `available` patches here
//! are based on the book read at step 1, so two interleaved orchestrations
//! can still base their patch on the same read.

use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::auth::json_object;
use crate::domain::clock::Clock;
use crate::domain::error::Error;
use crate::domain::model::{
    Book, PublicUser, Transaction, TransactionKind, TransactionStatus, User,
};
use crate::storage::collections;
use crate::storage::store::RecordStore;

pub const LOAN_PERIOD_DAYS: i64 = 14;

/// A transaction with its book and (redacted) user joined in.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoanView {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    pub borrow_date: chrono::DateTime<chrono::Utc>,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub return_date: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub book: Option<Book>,
    pub user: Option<PublicUser>,
}

impl LoanView {
    fn new(tx: Transaction, book: Option<Book>, user: Option<PublicUser>) -> Self {
        LoanView {
            id: tx.id,
            kind: tx.kind,
            status: tx.status,
            borrow_date: tx.borrow_date,
            due_date: tx.due_date,
            return_date: tx.return_date,
            created_at: tx.created_at,
            book,
            user,
        }
    }
}

#[derive(Clone)]
pub struct LendingService {
    store: RecordStore,
    clock: Arc<dyn Clock>,
}

impl LendingService {
    pub fn new(store: RecordStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn borrow(&self, user_id: i64, book_id: i64) -> Result<LoanView, Error> {
        // 1. The book must exist and have a copy on the shelf.
        let book = self.find_book(book_id).await?.ok_or(Error::NotFound("Book"))?;
        if book.available <= 0 {
            return Err(Error::Unavailable("Book is not available".to_string()));
        }

        // 2. One active loan per (user, book).
        if self.find_active_transaction(user_id, book_id).await?.is_some() {
            return Err(Error::Conflict(
                "You have already borrowed this book".to_string(),
            ));
        }

        // 3. Due in 14 days.
        let now = self.clock.now();
        let due_date = now + chrono::Duration::days(LOAN_PERIOD_DAYS);

        // 4. Record the transaction.
        let fields = json_object(json!({
            "user": user_id,
            "book": book_id,
            "type": TransactionKind::Borrow,
            "borrowDate": now,
            "dueDate": due_date,
            "status": TransactionStatus::Active,
        }));
        let stored = self.store.create(collections::TRANSACTIONS, fields).await?;
        let tx: Transaction = self.store.decode(collections::TRANSACTIONS, stored)?;

        // 5. Take a copy off the shelf.
        let patch = json_object(json!({ "available": book.available - 1 }));
        let updated_book = self
            .store
            .update(collections::BOOKS, book_id, patch)
            .await?
            .map(|v| self.store.decode::<Book>(collections::BOOKS, v))
            .transpose()?;

        // 6. Mirror the loan onto the user's borrowed list.
        let mut user = self.load_user(user_id).await?;
        user.borrowed_books.push(crate::domain::model::BorrowRecord {
            book: book_id,
            borrow_date: now,
            due_date,
        });
        let patch = json_object(json!({ "borrowedBooks": user.borrowed_books }));
        self.store.update(collections::USERS, user_id, patch).await?;

        info!(user = user_id, book = book_id, "book borrowed");
        Ok(LoanView::new(tx, updated_book, Some(user.into())))
    }

    pub async fn return_book(&self, user_id: i64, book_id: i64) -> Result<LoanView, Error> {
        // 1. There must be an active loan to return.
        let tx = self
            .find_active_transaction(user_id, book_id)
            .await?
            .ok_or(Error::NotFound("Active borrowing transaction"))?;

        // 2. Close the transaction.
        let now = self.clock.now();
        let patch = json_object(json!({
            "type": TransactionKind::Return,
            "returnDate": now,
            "status": TransactionStatus::Returned,
        }));
        let updated = self
            .store
            .update(collections::TRANSACTIONS, tx.id, patch)
            .await?
            .ok_or(Error::NotFound("Active borrowing transaction"))?;
        let tx: Transaction = self.store.decode(collections::TRANSACTIONS, updated)?;

        // 3. Put the copy back. If the book was deleted meanwhile this fails,
        //    and step 2 stays committed (no rollback, see module docs).
        let book = self.find_book(book_id).await?.ok_or(Error::NotFound("Book"))?;
        let patch = json_object(json!({ "available": book.available + 1 }));
        let updated_book = self
            .store
            .update(collections::BOOKS, book_id, patch)
            .await?
            .map(|v| self.store.decode::<Book>(collections::BOOKS, v))
            .transpose()?;

        // 4. Drop the loan from the user's borrowed list.
        let mut user = self.load_user(user_id).await?;
        user.borrowed_books.retain(|bb| bb.book != book_id);
        let patch = json_object(json!({ "borrowedBooks": user.borrowed_books }));
        self.store.update(collections::USERS, user_id, patch).await?;

        info!(user = user_id, book = book_id, "book returned");
        Ok(LoanView::new(tx, updated_book, Some(user.into())))
    }

    /// A user's transactions with books joined in, newest first. Only the
    /// admin listing joins users; the caller already knows who they are.
    pub async fn transactions_for_user(&self, user_id: i64) -> Result<Vec<LoanView>, Error> {
        let mut predicate = serde_json::Map::new();
        predicate.insert("user".to_string(), JsonValue::from(user_id));
        let records = self
            .store
            .find_all(collections::TRANSACTIONS, &predicate)
            .await?;
        self.join(records, |_| None).await
    }

    /// Every transaction with book and redacted user joined in, newest first.
    pub async fn all_transactions(&self) -> Result<Vec<LoanView>, Error> {
        let records = self.store.read_all(collections::TRANSACTIONS).await?;
        let users = self.store.read_all(collections::USERS).await?;
        let users: Vec<User> = users
            .into_iter()
            .map(|v| self.store.decode(collections::USERS, v))
            .collect::<Result<_, _>>()?;
        self.join(records, move |tx| {
            users.iter().find(|u| u.id == tx.user).cloned().map(PublicUser::from)
        })
        .await
    }

    async fn join(
        &self,
        records: Vec<JsonValue>,
        user_for: impl Fn(&Transaction) -> Option<PublicUser>,
    ) -> Result<Vec<LoanView>, Error> {
        let books = self.store.read_all(collections::BOOKS).await?;
        let books: Vec<Book> = books
            .into_iter()
            .map(|v| self.store.decode(collections::BOOKS, v))
            .collect::<Result<_, _>>()?;

        let mut views = Vec::with_capacity(records.len());
        for record in records {
            let tx: Transaction = self.store.decode(collections::TRANSACTIONS, record)?;
            let book = books.iter().find(|b| b.id == tx.book).cloned();
            let user = user_for(&tx);
            views.push(LoanView::new(tx, book, user));
        }
        views.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(views)
    }

    async fn find_book(&self, book_id: i64) -> Result<Option<Book>, Error> {
        let mut predicate = serde_json::Map::new();
        predicate.insert("id".to_string(), JsonValue::from(book_id));
        self.store
            .find_one(collections::BOOKS, &predicate)
            .await?
            .map(|v| self.store.decode(collections::BOOKS, v))
            .transpose()
    }

    async fn find_active_transaction(
        &self,
        user_id: i64,
        book_id: i64,
    ) -> Result<Option<Transaction>, Error> {
        let mut predicate = serde_json::Map::new();
        predicate.insert("user".to_string(), JsonValue::from(user_id));
        predicate.insert("book".to_string(), JsonValue::from(book_id));
        predicate.insert("status".to_string(), json!(TransactionStatus::Active));
        self.store
            .find_one(collections::TRANSACTIONS, &predicate)
            .await?
            .map(|v| self.store.decode(collections::TRANSACTIONS, v))
            .transpose()
    }

    async fn load_user(&self, user_id: i64) -> Result<User, Error> {
        let mut predicate = serde_json::Map::new();
        predicate.insert("id".to_string(), JsonValue::from(user_id));
        let found = self
            .store
            .find_one(collections::USERS, &predicate)
            .await?
            .ok_or(Error::NotFound("User"))?;
        self.store.decode(collections::USERS, found)
    }
}
