//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers and error types that form the vocabulary of the
//! card relay domain.

mod email;
mod errors;
mod ids;

pub use email::Email;
pub use errors::{ErrorCode, ValidationError};
pub use ids::{CustomerId, PaymentMethodId, UserId};
