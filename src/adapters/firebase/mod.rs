//! Firebase Realtime Database adapters.
//!
//! - `FirebaseDocumentStore` - REST client used in production
//! - `InMemoryDocumentStore` - in-process store for tests and development

mod firebase_store;
mod in_memory;

pub use firebase_store::{FirebaseConfig, FirebaseDocumentStore};
pub use in_memory::{InMemoryDocumentStore, StoreOperation, EMPTY_ETAG};
