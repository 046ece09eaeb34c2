//! Typed error taxonomy shared by the record store and the domain services.
//!
//! The core raises these; the HTTP layer owns the mapping to status codes
//! (see `transport::http`). A failed orchestration step never rolls back the
//! steps that already committed.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Failures of the persistence substrate itself. A missing document is NOT
/// an error (it reads as an empty collection); these cover unreadable or
/// malformed documents and failed rewrites.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to read collection '{collection}': {source}")]
    Read {
        collection: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write collection '{collection}': {source}")]
    Write {
        collection: String,
        #[source]
        source: std::io::Error,
    },

    #[error("collection '{collection}' is malformed: {source}")]
    Malformed {
        collection: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("collection '{collection}' is not a JSON array")]
    NotAnArray { collection: String },

    #[error("record in '{collection}' has unexpected shape: {source}")]
    BadRecord {
        collection: String,
        #[source]
        source: serde_json::Error,
    },
}
