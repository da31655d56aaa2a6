//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Stripe integration, including:
//! - Customer creation and deletion
//! - Setup intents for saving cards
//! - Payment method retrieval, attachment and detachment
//! - Off-session payment intents
//!
//! # Security
//!
//! - The secret key is handled via `secrecy::SecretString`
//!
//! # Configuration
//!
//! Required environment variables:
//! - `CARD_RELAY__PAYMENT__STRIPE_API_KEY`: Stripe secret API key

mod mock_payment_provider;
mod stripe_adapter;
mod stripe_types;

pub use mock_payment_provider::{MethodCall, MockPaymentProvider};
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter, DEFAULT_API_BASE_URL};
pub use stripe_types::{
    StripeApiError, StripeCard, StripeCustomer, StripeErrorBody, StripePaymentIntent,
    StripePaymentMethod, StripeSetupIntent,
};
