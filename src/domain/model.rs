//! Typed entities for the two APIs.
//!
//! Each entity persists as one element of its collection's JSON array. Field
//! names on the wire stay camelCase, matching the documents the original
//! service wrote, so an existing data directory keeps working.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Salted digest, stored as `salt$hex`. Never leaves the service layer;
    /// responses carry [`PublicUser`] instead.
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub borrowed_books: Vec<BorrowRecord>,
    pub created_at: DateTime<Utc>,
}

/// Denormalized duplicate of the user's active borrow transaction.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRecord {
    /// Book id.
    pub book: i64,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
}

/// Password-redacted projection of [`User`].
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub borrowed_books: Vec<BorrowRecord>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        PublicUser {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            borrowed_books: u.borrowed_books,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum BookCategory {
    Fiction,
    #[serde(rename = "Non-Fiction")]
    NonFiction,
    Science,
    #[serde(rename = "Science Fiction")]
    ScienceFiction,
    Technology,
    History,
    Biography,
    Children,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub category: BookCategory,
    pub description: String,
    /// Total copies owned.
    pub quantity: i64,
    /// Copies currently on the shelf. Intended invariant: `available <= quantity`.
    pub available: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Borrow,
    Return,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Active,
    Returned,
    Overdue,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    /// User id.
    pub user: i64,
    /// Book id.
    pub book: i64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub return_date: Option<DateTime<Utc>>,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

/// Read-only reference data; never mutated by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub description: String,
    pub price: f64,
    pub duration: String,
    pub rating: f64,
    #[serde(default)]
    pub reviews: i64,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub tour_id: i64,
    /// Snapshot of the tour name at booking time.
    pub tour_name: String,
    /// Requested travel date, kept as the caller-supplied string.
    pub date: String,
    pub travelers: i64,
    pub total_price: f64,
    #[serde(default)]
    pub special_requests: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// Opaque bearer-token session. Replaces the original's signed JWTs with
/// server-side state living in the same record store as everything else.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: i64,
    pub token: String,
    /// User id.
    pub user: i64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
