//! Wallet-specific error types.
//!
//! Errors raised while provisioning customers, recording cards, charging and
//! removing cards.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | ValidationFailed | 400 |
//! | PaymentMethodConflict | 409 |
//! | UnsupportedPaymentMethod | 422 |
//! | PaymentFailed | 400 / 402 / 404 / 500 / 502 / 503, by code |
//! | DocumentStore | 502 |
//! | Infrastructure | 500 |

use serde_json::Value;

use crate::domain::foundation::{ErrorCode, PaymentMethodId, ValidationError};

/// Message returned when a payment method belongs to someone else.
pub const PAYMENT_METHOD_CONFLICT_MESSAGE: &str =
    "Payment method is attached to a different customer.";

/// Wallet errors.
#[derive(Debug, Clone, PartialEq)]
pub enum WalletError {
    /// Request input failed validation.
    ValidationFailed { field: String, message: String },

    /// Payment method is attached to a customer other than the requesting one.
    PaymentMethodConflict { payment_method_id: PaymentMethodId },

    /// Payment method is not a card.
    UnsupportedPaymentMethod(PaymentMethodId),

    /// The payment provider rejected or failed the request.
    PaymentFailed {
        code: ErrorCode,
        message: String,
        details: Option<Value>,
    },

    /// The document store was unreachable, rejected the request or returned garbage.
    DocumentStore(String),

    /// Anything else.
    Infrastructure(String),
}

impl WalletError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        WalletError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn payment_method_conflict(payment_method_id: PaymentMethodId) -> Self {
        WalletError::PaymentMethodConflict { payment_method_id }
    }

    pub fn unsupported_payment_method(payment_method_id: PaymentMethodId) -> Self {
        WalletError::UnsupportedPaymentMethod(payment_method_id)
    }

    pub fn payment_failed(code: ErrorCode, message: impl Into<String>) -> Self {
        WalletError::PaymentFailed {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn document_store(message: impl Into<String>) -> Self {
        WalletError::DocumentStore(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        WalletError::Infrastructure(message.into())
    }

    /// Attaches provider details to a payment failure; other variants are unchanged.
    pub fn with_details(self, value: Value) -> Self {
        match self {
            WalletError::PaymentFailed { code, message, .. } => WalletError::PaymentFailed {
                code,
                message,
                details: Some(value),
            },
            other => other,
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            WalletError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            WalletError::PaymentMethodConflict { .. } => ErrorCode::PaymentMethodConflict,
            WalletError::UnsupportedPaymentMethod(_) => ErrorCode::UnsupportedPaymentMethod,
            WalletError::PaymentFailed { code, .. } => *code,
            WalletError::DocumentStore(_) => ErrorCode::DocumentStoreError,
            WalletError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }

    /// Returns a user-facing error message.
    ///
    /// Provider messages are passed through verbatim.
    pub fn message(&self) -> String {
        match self {
            WalletError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            WalletError::PaymentMethodConflict { .. } => {
                PAYMENT_METHOD_CONFLICT_MESSAGE.to_string()
            }
            WalletError::UnsupportedPaymentMethod(id) => {
                format!("Payment method {} has no card details", id)
            }
            WalletError::PaymentFailed { message, .. } => message.clone(),
            WalletError::DocumentStore(msg) => format!("Document store error: {}", msg),
            WalletError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Provider details for the error envelope, if any.
    pub fn details(&self) -> Option<&Value> {
        match self {
            WalletError::PaymentFailed { details, .. } => details.as_ref(),
            _ => None,
        }
    }
}

impl std::fmt::Display for WalletError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for WalletError {}

impl From<ValidationError> for WalletError {
    fn from(err: ValidationError) -> Self {
        WalletError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}
