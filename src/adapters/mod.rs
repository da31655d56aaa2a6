//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `stripe` - Payment provider (Stripe REST API, plus a mock)
//! - `firebase` - Document store (Firebase Realtime Database REST API, plus an in-memory store)
//! - `http` - Axum routes exposing the wallet endpoints

pub mod firebase;
pub mod http;
pub mod stripe;

pub use firebase::{FirebaseConfig, FirebaseDocumentStore, InMemoryDocumentStore};
pub use http::{api_app, WalletAppState};
pub use stripe::{MockPaymentProvider, StripeConfig, StripePaymentAdapter};
