//! In-Memory Document Store Adapter
//!
//! Holds documents in memory with Firebase-like revision tags.
//! Useful for testing and development.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::wallet::{DatabaseUrl, DocumentPath};
use crate::ports::{ConditionalWrite, DocumentStore, Snapshot, StoreError};

/// Revision tag reported for a path that holds no value.
pub const EMPTY_ETAG: &str = "null_etag";

/// Store operations that can be made to fail in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    Get,
    Put,
    PutIfMatch,
    Delete,
}

#[derive(Debug, Default)]
struct StoreState {
    documents: HashMap<String, Value>,
    revisions: HashMap<String, u64>,
    failures: HashMap<StoreOperation, StoreError>,
    // Writes applied just before the next conditional write to the same key
    interleaved: HashMap<String, Vec<Option<Value>>>,
}

impl StoreState {
    fn etag(&self, key: &str) -> String {
        match (self.documents.contains_key(key), self.revisions.get(key)) {
            (true, Some(rev)) => format!("rev-{}", rev),
            _ => EMPTY_ETAG.to_string(),
        }
    }

    fn write(&mut self, key: &str, value: Option<Value>) {
        match value {
            Some(Value::Null) | None => {
                self.documents.remove(key);
            }
            Some(value) => {
                self.documents.insert(key.to_string(), value);
            }
        }
        *self.revisions.entry(key.to_string()).or_insert(0) += 1;
    }

    fn fail(&self, operation: StoreOperation) -> Result<(), StoreError> {
        match self.failures.get(&operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

/// In-memory document store keyed by full document URL
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    state: Arc<RwLock<StoreState>>,
}

fn key(db: &DatabaseUrl, path: &DocumentPath) -> String {
    db.document_url(path).to_string()
}

impl InMemoryDocumentStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a value directly, bypassing failure injection
    pub async fn value_at(&self, db: &DatabaseUrl, path: &DocumentPath) -> Option<Value> {
        self.state.read().await.documents.get(&key(db, path)).cloned()
    }

    /// Write a value directly, bypassing failure injection
    pub async fn seed(&self, db: &DatabaseUrl, path: &DocumentPath, value: Value) {
        self.state.write().await.write(&key(db, path), Some(value));
    }

    /// Make every call of `operation` fail with `error`
    pub async fn fail_on(&self, operation: StoreOperation, error: StoreError) {
        self.state.write().await.failures.insert(operation, error);
    }

    /// Remove all injected failures
    pub async fn clear_failures(&self) {
        self.state.write().await.failures.clear();
    }

    /// Simulate another writer: `value` lands at `path` right before the next
    /// conditional write there. Queued values apply one per conditional write.
    pub async fn interleave_write(
        &self,
        db: &DatabaseUrl,
        path: &DocumentPath,
        value: Option<Value>,
    ) {
        self.state
            .write()
            .await
            .interleaved
            .entry(key(db, path))
            .or_default()
            .push(value);
    }

    /// Number of documents currently stored
    pub async fn document_count(&self) -> usize {
        self.state.read().await.documents.len()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, db: &DatabaseUrl, path: &DocumentPath) -> Result<Snapshot, StoreError> {
        let state = self.state.read().await;
        state.fail(StoreOperation::Get)?;

        let key = key(db, path);
        Ok(Snapshot::new(
            state.documents.get(&key).cloned(),
            Some(state.etag(&key)),
        ))
    }

    async fn put(
        &self,
        db: &DatabaseUrl,
        path: &DocumentPath,
        value: &Value,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.fail(StoreOperation::Put)?;

        state.write(&key(db, path), Some(value.clone()));
        Ok(())
    }

    async fn put_if_match(
        &self,
        db: &DatabaseUrl,
        path: &DocumentPath,
        value: &Value,
        etag: &str,
    ) -> Result<ConditionalWrite, StoreError> {
        let mut state = self.state.write().await;
        state.fail(StoreOperation::PutIfMatch)?;

        let key = key(db, path);
        let pending = state
            .interleaved
            .get_mut(&key)
            .filter(|queue| !queue.is_empty())
            .map(|queue| queue.remove(0));
        if let Some(other) = pending {
            state.write(&key, other);
        }

        let current = state.etag(&key);
        if current != etag {
            return Ok(ConditionalWrite::Conflict(Snapshot::new(
                state.documents.get(&key).cloned(),
                Some(current),
            )));
        }

        state.write(&key, Some(value.clone()));
        Ok(ConditionalWrite::Written)
    }

    async fn delete(&self, db: &DatabaseUrl, path: &DocumentPath) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.fail(StoreOperation::Delete)?;

        state.write(&key(db, path), None);
        Ok(())
    }
}
