//! Registration, login and bearer-token sessions.
//!
//! Tokens are opaque 256-bit values stored in the `sessions` collection and
//! checked against their expiry on every request. Passwords are stored as
//! `salt$hex` salted SHA-256 digests; they never appear in responses, which
//! carry [`PublicUser`] / [`UserProfile`] projections instead.

use rand::RngCore;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::domain::clock::Clock;
use crate::domain::error::Error;
use crate::domain::model::{Book, BorrowRecord, PublicUser, Role, Session, User};
use crate::storage::collections;
use crate::storage::store::RecordStore;

pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt = hex::encode(salt);
    format!("{salt}${}", digest(&salt, password))
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, expected)) => digest(salt, password) == expected,
        None => false,
    }
}

/// A borrow entry with its book joined in (book may have been deleted since).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedBorrow {
    pub book: Option<Book>,
    pub borrow_date: chrono::DateTime<chrono::Utc>,
    pub due_date: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub borrowed_books: Vec<PopulatedBorrow>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Clone)]
pub struct AuthService {
    store: RecordStore,
    clock: Arc<dyn Clock>,
    session_days: i64,
}

impl AuthService {
    pub fn new(store: RecordStore, clock: Arc<dyn Clock>, session_days: i64) -> Self {
        Self { store, clock, session_days }
    }

    /// Creates a user and issues a session token. The email is
    /// unique-by-convention: taken emails are rejected here, nothing enforces
    /// uniqueness below this check.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Option<Role>,
    ) -> Result<(PublicUser, String), Error> {
        let mut predicate = serde_json::Map::new();
        predicate.insert("email".to_string(), JsonValue::from(email));
        if self
            .store
            .find_one(collections::USERS, &predicate)
            .await?
            .is_some()
        {
            return Err(Error::Conflict("User already exists".to_string()));
        }

        let fields = json_object(json!({
            "name": name,
            "email": email,
            "password": hash_password(password),
            "role": role.unwrap_or(Role::User),
            "borrowedBooks": [],
        }));
        let stored = self.store.create(collections::USERS, fields).await?;
        let user: User = self.store.decode(collections::USERS, stored)?;

        let token = self.issue_session(user.id).await?;
        Ok((user.into(), token))
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<(PublicUser, String), Error> {
        let mut predicate = serde_json::Map::new();
        predicate.insert("email".to_string(), JsonValue::from(email));
        let found = self.store.find_one(collections::USERS, &predicate).await?;

        let user: User = match found {
            Some(v) => self.store.decode(collections::USERS, v)?,
            None => return Err(Error::Unauthorized("Invalid credentials".to_string())),
        };
        if !verify_password(password, &user.password) {
            return Err(Error::Unauthorized("Invalid credentials".to_string()));
        }

        let token = self.issue_session(user.id).await?;
        Ok((user.into(), token))
    }

    async fn issue_session(&self, user_id: i64) -> Result<String, Error> {
        let mut raw = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut raw);
        let token = hex::encode(raw);

        let expires_at = self.clock.now() + chrono::Duration::days(self.session_days);
        let fields = json_object(json!({
            "token": token,
            "user": user_id,
            "expiresAt": expires_at,
        }));
        self.store.create(collections::SESSIONS, fields).await?;
        Ok(token)
    }

    /// Resolves a bearer token to its user. Fails on unknown or expired
    /// tokens; expired sessions are left in place (no reaper, matching the
    /// original's stateless 30-day tokens).
    pub async fn authenticate(&self, token: &str) -> Result<User, Error> {
        let mut predicate = serde_json::Map::new();
        predicate.insert("token".to_string(), JsonValue::from(token));
        let found = self
            .store
            .find_one(collections::SESSIONS, &predicate)
            .await?
            .ok_or_else(|| Error::Unauthorized("Not authorized, invalid token".to_string()))?;
        let session: Session = self.store.decode(collections::SESSIONS, found)?;

        if session.expires_at <= self.clock.now() {
            return Err(Error::Unauthorized("Not authorized, token expired".to_string()));
        }

        self.load_user(session.user).await
    }

    pub async fn load_user(&self, user_id: i64) -> Result<User, Error> {
        let mut predicate = serde_json::Map::new();
        predicate.insert("id".to_string(), JsonValue::from(user_id));
        let found = self
            .store
            .find_one(collections::USERS, &predicate)
            .await?
            .ok_or(Error::NotFound("User"))?;
        self.store.decode(collections::USERS, found)
    }

    /// Redacted user with each borrowed book joined in.
    pub async fn profile(&self, user_id: i64) -> Result<UserProfile, Error> {
        let user = self.load_user(user_id).await?;
        let books = self.load_books().await?;
        Ok(populate(user, &books))
    }

    /// All users, redacted and populated, newest first.
    pub async fn list_users(&self) -> Result<Vec<UserProfile>, Error> {
        let records = self.store.read_all(collections::USERS).await?;
        let books = self.load_books().await?;

        let mut profiles = Vec::with_capacity(records.len());
        for record in records {
            let user: User = self.store.decode(collections::USERS, record)?;
            profiles.push(populate(user, &books));
        }
        profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(profiles)
    }

    async fn load_books(&self) -> Result<Vec<Book>, Error> {
        let records = self.store.read_all(collections::BOOKS).await?;
        records
            .into_iter()
            .map(|r| self.store.decode(collections::BOOKS, r))
            .collect()
    }
}

fn populate(user: User, books: &[Book]) -> UserProfile {
    let borrowed_books = user
        .borrowed_books
        .iter()
        .map(|bb: &BorrowRecord| PopulatedBorrow {
            book: books.iter().find(|b| b.id == bb.book).cloned(),
            borrow_date: bb.borrow_date,
            due_date: bb.due_date,
        })
        .collect();
    UserProfile {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        borrowed_books,
        created_at: user.created_at,
    }
}

pub(crate) fn json_object(v: JsonValue) -> serde_json::Map<String, JsonValue> {
    match v {
        JsonValue::Object(map) => map,
        _ => unreachable!("json! literal is always an object here"),
    }
}
