//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application and the outside world. Adapters implement these ports.
//!
//! - `PaymentProvider` - customers, setup intents, payment methods, charges
//! - `DocumentStore` - the per-user JSON records

mod document_store;
mod payment_provider;

pub use document_store::{ConditionalWrite, DocumentStore, Snapshot, StoreError};
pub use payment_provider::{
    CardDetails, CreateCustomerRequest, CreatePaymentIntentRequest, CreateSetupIntentRequest,
    Customer, PaymentError, PaymentErrorCode, PaymentIntent, PaymentIntentRef,
    PaymentIntentStatus, PaymentMethod, PaymentProvider, SetupIntent, SetupUsage,
};
