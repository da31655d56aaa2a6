//! HTTP adapter for wallet endpoints.
//!
//! Exposes the wallet domain via REST API:
//! - `POST /api/create-setup-intent` - Find or create the customer, open a setup intent
//! - `POST /api/store-payment-method` - Save card display fields for a user
//! - `POST /api/pay-with-saved-card` - Charge a saved card off-session
//! - `POST /api/delete-card` - Remove a saved card from the store and provider

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{status_for, WalletApiError, WalletAppState};
pub use routes::{wallet_router, wallet_routes};
