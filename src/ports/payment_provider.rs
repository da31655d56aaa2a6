//! Payment provider port for external payment processing.
//!
//! Defines the contract for payment gateway integrations (e.g., Stripe).
//! Implementations handle customer provisioning, card setup, payment method
//! attachment and off-session charges.
//!
//! # Design
//!
//! - **Gateway agnostic**: Interface works with any payment provider
//! - **Card-focused**: Only card payment methods are set up or charged
//! - **Single attempt**: No operation is retried by the port

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::domain::foundation::{CustomerId, ErrorCode, PaymentMethodId, UserId};
use crate::domain::wallet::{CardMetadata, ChargeAmount, Currency, WalletError};

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a customer in the payment system.
    ///
    /// Returns the provider's customer for future reference.
    async fn create_customer(&self, request: CreateCustomerRequest)
        -> Result<Customer, PaymentError>;

    /// Permanently delete a customer.
    async fn delete_customer(&self, customer_id: &CustomerId) -> Result<(), PaymentError>;

    /// Create a setup intent so the client can collect and save a card.
    async fn create_setup_intent(
        &self,
        request: CreateSetupIntentRequest,
    ) -> Result<SetupIntent, PaymentError>;

    /// Get a payment method by provider ID.
    async fn get_payment_method(
        &self,
        payment_method_id: &PaymentMethodId,
    ) -> Result<PaymentMethod, PaymentError>;

    /// Attach a payment method to a customer.
    async fn attach_payment_method(
        &self,
        payment_method_id: &PaymentMethodId,
        customer_id: &CustomerId,
    ) -> Result<PaymentMethod, PaymentError>;

    /// Detach a payment method from whichever customer holds it.
    async fn detach_payment_method(
        &self,
        payment_method_id: &PaymentMethodId,
    ) -> Result<PaymentMethod, PaymentError>;

    /// Create (and optionally confirm) a payment intent.
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError>;
}

/// Request to create a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    /// Internal user ID (stored as metadata).
    pub user_id: UserId,

    /// Customer email address.
    pub email: String,
}

/// Customer in the payment system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Provider's customer ID.
    pub id: CustomerId,

    /// Customer email.
    pub email: Option<String>,
}

/// How a saved payment method will be used later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupUsage {
    /// Merchant-initiated charges while the customer is absent.
    OffSession,
}

impl SetupUsage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetupUsage::OffSession => "off_session",
        }
    }
}

/// Request to create a setup intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSetupIntentRequest {
    /// Customer the saved card will belong to.
    pub customer_id: CustomerId,

    /// Intended future usage.
    pub usage: SetupUsage,
}

/// Setup intent created for the client to confirm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupIntent {
    /// Provider's setup intent ID.
    pub id: String,

    /// Secret the client uses to confirm the intent.
    pub client_secret: String,

    /// Provider status (requires_payment_method, succeeded, ...).
    pub status: String,
}

/// Card details of a payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDetails {
    pub brand: String,
    pub last4: String,
    pub exp_month: u32,
    pub exp_year: u32,
}

impl From<&CardDetails> for CardMetadata {
    fn from(card: &CardDetails) -> Self {
        CardMetadata {
            brand: card.brand.clone(),
            last4: card.last4.clone(),
            exp_month: card.exp_month,
            exp_year: card.exp_year,
        }
    }
}

/// Payment method in the payment system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethod {
    /// Provider's payment method ID.
    pub id: PaymentMethodId,

    /// Customer the method is attached to, if any.
    pub customer: Option<CustomerId>,

    /// Card details (None for non-card methods).
    pub card: Option<CardDetails>,
}

/// Request to create a payment intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentIntentRequest {
    pub amount: ChargeAmount,
    pub currency: Currency,
    pub customer_id: CustomerId,
    pub payment_method_id: PaymentMethodId,

    /// Charge without the customer present.
    pub off_session: bool,

    /// Confirm immediately on creation.
    pub confirm: bool,
}

/// Payment intent in the payment system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Provider's payment intent ID.
    pub id: String,

    /// Status exactly as the provider reported it.
    pub status: String,

    /// Client secret (needed to finish authentication on-session).
    pub client_secret: Option<String>,
}

impl PaymentIntent {
    /// Status as a known variant, `Unknown` for anything newer than this enum.
    pub fn kind(&self) -> PaymentIntentStatus {
        PaymentIntentStatus::from_provider(&self.status)
    }

    /// Whether the customer must come back on-session to finish the payment.
    pub fn needs_customer_action(&self) -> bool {
        self.kind().needs_customer_action()
    }
}

/// Payment intent status from payment provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentIntentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    RequiresCapture,
    Canceled,
    Succeeded,

    /// Unknown status from provider.
    #[serde(other)]
    Unknown,
}

impl PaymentIntentStatus {
    pub fn from_provider(raw: &str) -> Self {
        match raw {
            "requires_payment_method" => PaymentIntentStatus::RequiresPaymentMethod,
            "requires_confirmation" => PaymentIntentStatus::RequiresConfirmation,
            "requires_action" => PaymentIntentStatus::RequiresAction,
            "processing" => PaymentIntentStatus::Processing,
            "requires_capture" => PaymentIntentStatus::RequiresCapture,
            "canceled" => PaymentIntentStatus::Canceled,
            "succeeded" => PaymentIntentStatus::Succeeded,
            _ => PaymentIntentStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentIntentStatus::RequiresPaymentMethod => "requires_payment_method",
            PaymentIntentStatus::RequiresConfirmation => "requires_confirmation",
            PaymentIntentStatus::RequiresAction => "requires_action",
            PaymentIntentStatus::Processing => "processing",
            PaymentIntentStatus::RequiresCapture => "requires_capture",
            PaymentIntentStatus::Canceled => "canceled",
            PaymentIntentStatus::Succeeded => "succeeded",
            PaymentIntentStatus::Unknown => "unknown",
        }
    }

    /// Whether the customer must come back on-session to finish the payment.
    pub fn needs_customer_action(&self) -> bool {
        matches!(self, PaymentIntentStatus::RequiresAction)
    }
}

impl std::fmt::Display for PaymentIntentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment intent referenced by a provider error (e.g. a charge needing 3-D Secure).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntentRef {
    pub id: String,
    pub status: Option<String>,
    pub client_secret: Option<String>,
}

/// Errors from payment provider operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Provider's error type (card_error, invalid_request_error, ...).
    pub error_type: Option<String>,

    /// Provider's error code (if available).
    pub provider_code: Option<String>,

    /// Issuer decline code for card errors.
    pub decline_code: Option<String>,

    /// Payment intent the error refers to.
    pub payment_intent: Option<PaymentIntentRef>,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            error_type: None,
            provider_code: None,
            decline_code: None,
            payment_intent: None,
        }
    }

    /// Create with provider code.
    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    /// Create with issuer decline code.
    pub fn with_decline_code(mut self, code: impl Into<String>) -> Self {
        self.decline_code = Some(code.into());
        self
    }

    /// Create with the payment intent the error refers to.
    pub fn with_payment_intent(mut self, intent: PaymentIntentRef) -> Self {
        self.payment_intent = Some(intent);
        self
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::AuthenticationError, message)
    }

    /// Create a card declined error.
    pub fn card_declined(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::CardDeclined, message)
    }

    /// Create an error for a charge that needs the customer to authenticate.
    pub fn authentication_required(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::AuthenticationRequired, message)
    }

    /// Create a not found error.
    pub fn not_found(resource: &str) -> Self {
        Self::new(
            PaymentErrorCode::NotFound,
            format!("{} not found", resource),
        )
    }

    /// Provider fields worth returning to the API caller.
    pub fn details(&self) -> Value {
        let mut details = Map::new();
        details.insert("code".to_string(), json!(self.code.to_string()));
        if let Some(error_type) = &self.error_type {
            details.insert("type".to_string(), json!(error_type));
        }
        if let Some(provider_code) = &self.provider_code {
            details.insert("providerCode".to_string(), json!(provider_code));
        }
        if let Some(decline_code) = &self.decline_code {
            details.insert("declineCode".to_string(), json!(decline_code));
        }
        if let Some(intent) = &self.payment_intent {
            details.insert("paymentIntentId".to_string(), json!(intent.id));
            if let Some(status) = &intent.status {
                details.insert("paymentIntentStatus".to_string(), json!(status));
            }
            if let Some(secret) = &intent.client_secret {
                details.insert("clientSecret".to_string(), json!(secret));
            }
        }
        Value::Object(details)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for WalletError {
    fn from(err: PaymentError) -> Self {
        let code = match err.code {
            PaymentErrorCode::CardDeclined
            | PaymentErrorCode::InsufficientFunds
            | PaymentErrorCode::CardExpired
            | PaymentErrorCode::InvalidCard => ErrorCode::CardDeclined,
            PaymentErrorCode::AuthenticationRequired => ErrorCode::AuthenticationRequired,
            PaymentErrorCode::NotFound => ErrorCode::ProviderResourceNotFound,
            PaymentErrorCode::InvalidRequest => ErrorCode::ProviderInvalidRequest,
            PaymentErrorCode::RateLimitExceeded => ErrorCode::ProviderRateLimited,
            PaymentErrorCode::AuthenticationError => ErrorCode::InternalError,
            PaymentErrorCode::NetworkError
            | PaymentErrorCode::ProviderError
            | PaymentErrorCode::Unknown => ErrorCode::PaymentProviderError,
        };

        let details = err.details();
        WalletError::payment_failed(code, err.message).with_details(details)
    }
}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    /// Card was declined.
    CardDeclined,

    /// Insufficient funds.
    InsufficientFunds,

    /// Card expired.
    CardExpired,

    /// Invalid card details.
    InvalidCard,

    /// Customer must authenticate (3-D Secure) before the charge can succeed.
    AuthenticationRequired,

    /// Provider rejected the request parameters.
    InvalidRequest,

    /// Resource not found.
    NotFound,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Provider API error.
    ProviderError,

    /// Unknown error.
    Unknown,
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::CardDeclined => "card_declined",
            PaymentErrorCode::InsufficientFunds => "insufficient_funds",
            PaymentErrorCode::CardExpired => "card_expired",
            PaymentErrorCode::InvalidCard => "invalid_card",
            PaymentErrorCode::AuthenticationRequired => "authentication_required",
            PaymentErrorCode::InvalidRequest => "invalid_request",
            PaymentErrorCode::NotFound => "not_found",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::ProviderError => "provider_error",
            PaymentErrorCode::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn payment_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn PaymentProvider) {}
    }

    #[test]
    fn payment_error_display() {
        let err = PaymentError::card_declined("Your card was declined");
        assert!(err.to_string().contains("card_declined"));
        assert!(err.to_string().contains("Your card was declined"));
    }

    #[test]
    fn intent_status_maps_unknown_values() {
        let status = PaymentIntentStatus::from_provider("requires_action");
        assert_eq!(status, PaymentIntentStatus::RequiresAction);
        assert!(status.needs_customer_action());

        assert_eq!(
            PaymentIntentStatus::from_provider("something_new"),
            PaymentIntentStatus::Unknown
        );
    }

    #[test]
    fn card_details_convert_to_metadata() {
        let card = CardDetails {
            brand: "visa".to_string(),
            last4: "4242".to_string(),
            exp_month: 12,
            exp_year: 2030,
        };
        let metadata = CardMetadata::from(&card);
        assert_eq!(metadata.last4, "4242");
        assert_eq!(metadata.exp_year, 2030);
    }

    #[test]
    fn declines_convert_to_card_declined() {
        for code in [
            PaymentErrorCode::CardDeclined,
            PaymentErrorCode::InsufficientFunds,
            PaymentErrorCode::CardExpired,
        ] {
            let err: WalletError = PaymentError::new(code, "declined").into();
            assert_eq!(err.code(), ErrorCode::CardDeclined);
        }
    }

    #[test]
    fn authentication_required_carries_intent_details() {
        let err = PaymentError::authentication_required("This payment requires authentication.")
            .with_provider_code("authentication_required")
            .with_payment_intent(PaymentIntentRef {
                id: "pi_123".to_string(),
                status: Some("requires_payment_method".to_string()),
                client_secret: Some("pi_123_secret_abc".to_string()),
            });

        let wallet_err: WalletError = err.into();
        assert_eq!(wallet_err.code(), ErrorCode::AuthenticationRequired);
        assert_eq!(wallet_err.message(), "This payment requires authentication.");

        let details = wallet_err.details().unwrap();
        assert_eq!(details["paymentIntentId"], "pi_123");
        assert_eq!(details["clientSecret"], "pi_123_secret_abc");
        assert_eq!(details["providerCode"], "authentication_required");
    }

    #[test]
    fn bad_api_key_is_an_internal_error() {
        let err: WalletError = PaymentError::authentication("Invalid API Key provided").into();
        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[test]
    fn transport_failures_are_provider_errors() {
        let err: WalletError = PaymentError::network("connection reset").into();
        assert_eq!(err.code(), ErrorCode::PaymentProviderError);

        let err: WalletError = PaymentError::not_found("Payment method").into();
        assert_eq!(err.code(), ErrorCode::ProviderResourceNotFound);
    }
}
