//! HTTP DTOs (Data Transfer Objects) for wallet endpoints.
//!
//! These types define the JSON request/response structure for the wallet API.
//! Request fields are optional at the serde level so that a missing field is
//! reported by name through the same validation path as a malformed one.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::{
    CreateSetupIntentCommand, CreateSetupIntentResult, DeleteCardCommand,
    PayWithSavedCardCommand, PayWithSavedCardResult, StorePaymentMethodCommand,
};
use crate::domain::foundation::{CustomerId, Email, PaymentMethodId, UserId, ValidationError};
use crate::domain::wallet::{ChargeAmount, Currency, DatabaseUrl};

fn required(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::empty_field(field)),
    }
}

fn payment_method_id(value: Option<String>) -> Result<PaymentMethodId, ValidationError> {
    PaymentMethodId::new(required("paymentMethodId", value)?)
}

fn database_url(value: Option<String>) -> Result<DatabaseUrl, ValidationError> {
    DatabaseUrl::parse(&required("firebaseDbUrl", value)?)
}

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to create a setup intent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSetupIntentRequest {
    /// Email for the provider customer.
    pub email: Option<String>,
    /// Root URL of the caller's database.
    pub firebase_db_url: Option<String>,
    /// The user's id in that database.
    pub uid: Option<String>,
}

impl CreateSetupIntentRequest {
    pub fn into_command(self) -> Result<CreateSetupIntentCommand, ValidationError> {
        Ok(CreateSetupIntentCommand {
            user_id: UserId::new(required("uid", self.uid)?)?,
            email: Email::new(required("email", self.email)?)?,
            database: database_url(self.firebase_db_url)?,
        })
    }
}

/// Request to store a payment method's card metadata.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorePaymentMethodRequest {
    pub uid: Option<String>,
    pub payment_method_id: Option<String>,
    pub firebase_db_url: Option<String>,
}

impl StorePaymentMethodRequest {
    pub fn into_command(self) -> Result<StorePaymentMethodCommand, ValidationError> {
        Ok(StorePaymentMethodCommand {
            user_id: UserId::new(required("uid", self.uid)?)?,
            payment_method_id: payment_method_id(self.payment_method_id)?,
            database: database_url(self.firebase_db_url)?,
        })
    }
}

/// Request to charge a saved card.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayWithSavedCardRequest {
    pub customer_id: Option<String>,
    pub payment_method_id: Option<String>,
    /// Amount in minor units; kept raw so non-integers are reported clearly.
    pub amount: Option<Value>,
    /// Three-letter currency code; the configured default applies when absent.
    pub currency: Option<String>,
}

impl PayWithSavedCardRequest {
    pub fn into_command(self) -> Result<PayWithSavedCardCommand, ValidationError> {
        let amount = match self.amount {
            None | Some(Value::Null) => return Err(ValidationError::empty_field("amount")),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(minor_units) => ChargeAmount::new(minor_units)?,
                None => {
                    return Err(ValidationError::invalid_format(
                        "amount",
                        "must be an integer number of minor units",
                    ))
                }
            },
            Some(_) => {
                return Err(ValidationError::invalid_format(
                    "amount",
                    "must be an integer number of minor units",
                ))
            }
        };

        let currency = match self.currency {
            Some(code) => Some(Currency::new(&code)?),
            None => None,
        };

        Ok(PayWithSavedCardCommand {
            customer_id: CustomerId::new(required("customerId", self.customer_id)?)?,
            payment_method_id: payment_method_id(self.payment_method_id)?,
            amount,
            currency,
        })
    }
}

/// Request to delete a saved card.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCardRequest {
    pub uid: Option<String>,
    pub payment_method_id: Option<String>,
    pub firebase_db_url: Option<String>,
}

impl DeleteCardRequest {
    pub fn into_command(self) -> Result<DeleteCardCommand, ValidationError> {
        Ok(DeleteCardCommand {
            user_id: UserId::new(required("uid", self.uid)?)?,
            payment_method_id: payment_method_id(self.payment_method_id)?,
            database: database_url(self.firebase_db_url)?,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response for a created setup intent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupIntentResponse {
    pub client_secret: String,
    pub stripe_id: String,
}

impl From<CreateSetupIntentResult> for SetupIntentResponse {
    fn from(result: CreateSetupIntentResult) -> Self {
        Self {
            client_secret: result.client_secret,
            stripe_id: result.customer_id.to_string(),
        }
    }
}

/// Response for a stored payment method.
#[derive(Debug, Clone, Serialize)]
pub struct SavedResponse {
    pub saved: bool,
}

/// Response for a created charge.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeResponse {
    pub status: String,
    pub payment_intent_id: String,
    /// Only present when the customer has to complete authentication.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

impl From<PayWithSavedCardResult> for ChargeResponse {
    fn from(result: PayWithSavedCardResult) -> Self {
        let intent = result.payment_intent;
        let client_secret = if intent.needs_customer_action() {
            intent.client_secret
        } else {
            None
        };

        Self {
            status: intent.status,
            payment_intent_id: intent.id,
            client_secret,
        }
    }
}

/// Response for a deleted card.
#[derive(Debug, Clone, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Error code for programmatic handling.
    pub code: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            details: None,
        }
    }

    /// Create an error response with details.
    pub fn with_details(code: impl Into<String>, error: impl Into<String>, details: Value) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            details: Some(details),
        }
    }
}
