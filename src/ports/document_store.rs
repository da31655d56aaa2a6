//! Document Store Port - REST-addressable JSON tree holding per-user records.
//!
//! The database is chosen per request, so every operation takes the
//! [`DatabaseUrl`] alongside the [`DocumentPath`].

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::wallet::{DatabaseUrl, DocumentPath, WalletError};

/// A value read from the store together with its revision tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Stored value; `None` when nothing is stored at the path.
    pub value: Option<Value>,

    /// Revision tag usable for a conditional write.
    pub etag: Option<String>,
}

impl Snapshot {
    pub fn new(value: Option<Value>, etag: Option<String>) -> Self {
        Self { value, etag }
    }
}

/// Outcome of a conditional write.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionalWrite {
    /// The value was written.
    Written,

    /// The stored value changed since the tag was taken; carries the current state.
    Conflict(Snapshot),
}

/// Errors that can occur during document store operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Request to {path} failed: {message}")]
    Network { path: String, message: String },

    #[error("{path} returned HTTP {status}")]
    Status { path: String, status: u16 },

    #[error("{path} returned malformed JSON: {message}")]
    Malformed { path: String, message: String },
}

impl StoreError {
    /// True when the store answered with a non-success HTTP status.
    pub fn is_status(&self) -> bool {
        matches!(self, StoreError::Status { .. })
    }
}

impl From<StoreError> for WalletError {
    fn from(err: StoreError) -> Self {
        WalletError::document_store(err.to_string())
    }
}

/// Port for reading and writing JSON documents
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the value at a path.
    ///
    /// # Errors
    /// `StoreError::Status` for non-success responses, `Network` when the store
    /// is unreachable, `Malformed` when the body is not JSON.
    async fn get(&self, db: &DatabaseUrl, path: &DocumentPath) -> Result<Snapshot, StoreError>;

    /// Overwrite the value at a path.
    async fn put(
        &self,
        db: &DatabaseUrl,
        path: &DocumentPath,
        value: &Value,
    ) -> Result<(), StoreError>;

    /// Overwrite the value at a path only if its revision still matches `etag`.
    async fn put_if_match(
        &self,
        db: &DatabaseUrl,
        path: &DocumentPath,
        value: &Value,
        etag: &str,
    ) -> Result<ConditionalWrite, StoreError>;

    /// Remove the value at a path. Removing a missing value succeeds.
    async fn delete(&self, db: &DatabaseUrl, path: &DocumentPath) -> Result<(), StoreError>;
}
