//! Stripe-specific response types.
//!
//! These types represent Stripe API objects as they arrive in REST responses.
//! Only the fields the relay reads are declared; everything else is ignored.

use serde::Deserialize;

use crate::ports::{PaymentError, PaymentErrorCode, PaymentIntentRef};

// ════════════════════════════════════════════════════════════════════════════════
// API Objects
// ════════════════════════════════════════════════════════════════════════════════

/// Stripe Customer object (subset of fields).
#[derive(Debug, Clone, Deserialize)]
pub struct StripeCustomer {
    /// Customer ID (cus_...).
    pub id: String,

    /// Customer email.
    pub email: Option<String>,
}

/// Response to `DELETE /v1/customers/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeDeletedObject {
    pub id: String,

    #[serde(default)]
    pub deleted: bool,
}

/// Stripe SetupIntent object (subset of fields).
#[derive(Debug, Clone, Deserialize)]
pub struct StripeSetupIntent {
    /// SetupIntent ID (seti_...).
    pub id: String,

    /// Secret for client-side confirmation.
    pub client_secret: String,

    /// requires_payment_method, requires_confirmation, succeeded, ...
    pub status: String,
}

/// Card details nested in a PaymentMethod.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeCard {
    pub brand: String,
    pub last4: String,
    pub exp_month: u32,
    pub exp_year: u32,
}

/// Stripe PaymentMethod object (subset of fields).
#[derive(Debug, Clone, Deserialize)]
pub struct StripePaymentMethod {
    /// PaymentMethod ID (pm_...).
    pub id: String,

    /// Customer ID the method is attached to (unexpanded).
    pub customer: Option<String>,

    /// Card details, present when `type` is `card`.
    pub card: Option<StripeCard>,
}

/// Stripe PaymentIntent object (subset of fields).
#[derive(Debug, Clone, Deserialize)]
pub struct StripePaymentIntent {
    /// PaymentIntent ID (pi_...).
    pub id: String,

    /// Current status.
    pub status: String,

    /// Secret for client-side confirmation.
    pub client_secret: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════════

/// Envelope of every Stripe error response.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorBody {
    pub error: StripeApiError,
}

/// Stripe error object.
///
/// ```json
/// {"error": {"type": "card_error", "code": "card_declined",
///            "decline_code": "insufficient_funds", "message": "..."}}
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct StripeApiError {
    /// api_error, card_error, idempotency_error, invalid_request_error, ...
    #[serde(rename = "type")]
    pub error_type: Option<String>,

    pub code: Option<String>,

    pub decline_code: Option<String>,

    pub message: Option<String>,

    /// PaymentIntent the error concerns (card errors on confirmation).
    pub payment_intent: Option<StripePaymentIntent>,
}

impl StripeApiError {
    /// Categorize the error from the HTTP status and Stripe's own codes.
    pub fn error_code(&self, http_status: u16) -> PaymentErrorCode {
        let code = self.code.as_deref();
        let decline_code = self.decline_code.as_deref();

        if http_status == 401 {
            return PaymentErrorCode::AuthenticationError;
        }
        if http_status == 429 || self.error_type.as_deref() == Some("rate_limit_error") {
            return PaymentErrorCode::RateLimitExceeded;
        }

        if self.error_type.as_deref() == Some("card_error") {
            if code == Some("authentication_required")
                || decline_code == Some("authentication_required")
            {
                return PaymentErrorCode::AuthenticationRequired;
            }
            return match (code, decline_code) {
                (_, Some("insufficient_funds")) | (Some("insufficient_funds"), _) => {
                    PaymentErrorCode::InsufficientFunds
                }
                (Some("expired_card"), _) | (_, Some("expired_card")) => {
                    PaymentErrorCode::CardExpired
                }
                (
                    Some(
                        "incorrect_number" | "invalid_number" | "invalid_cvc" | "incorrect_cvc"
                        | "invalid_expiry_month" | "invalid_expiry_year",
                    ),
                    _,
                ) => PaymentErrorCode::InvalidCard,
                _ => PaymentErrorCode::CardDeclined,
            };
        }

        if http_status == 404 || code == Some("resource_missing") {
            return PaymentErrorCode::NotFound;
        }
        if http_status >= 500 || self.error_type.as_deref() == Some("api_error") {
            return PaymentErrorCode::ProviderError;
        }
        if self.error_type.as_deref() == Some("invalid_request_error") || http_status == 400 {
            return PaymentErrorCode::InvalidRequest;
        }

        PaymentErrorCode::ProviderError
    }

    /// Convert into the port error, keeping Stripe's codes for the caller.
    pub fn into_payment_error(self, http_status: u16) -> PaymentError {
        let code = self.error_code(http_status);
        let message = self
            .message
            .clone()
            .unwrap_or_else(|| format!("Stripe API error (HTTP {})", http_status));

        let mut error = PaymentError::new(code, message);
        error.error_type = self.error_type;
        error.provider_code = self.code;
        error.decline_code = self.decline_code;
        error.payment_intent = self.payment_intent.map(|pi| PaymentIntentRef {
            id: pi.id,
            status: Some(pi.status),
            client_secret: pi.client_secret,
        });
        error
    }
}
