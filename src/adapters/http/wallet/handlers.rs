//! HTTP handlers for wallet endpoints.
//!
//! These handlers connect Axum routes to application layer command handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use crate::application::{
    CreateSetupIntentHandler, DeleteCardHandler, PayWithSavedCardHandler,
    StorePaymentMethodHandler,
};
use crate::domain::foundation::{ErrorCode, ValidationError};
use crate::domain::wallet::{Currency, WalletError};
use crate::ports::{DocumentStore, PaymentProvider};

use super::dto::{
    ChargeResponse, CreateSetupIntentRequest, DeleteCardRequest, DeletedResponse, ErrorResponse,
    PayWithSavedCardRequest, SavedResponse, SetupIntentResponse, StorePaymentMethodRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// This struct is cloned for each request and contains Arc-wrapped dependencies
/// for efficient sharing across handlers.
#[derive(Clone)]
pub struct WalletAppState {
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub document_store: Arc<dyn DocumentStore>,
    pub default_currency: Currency,
}

impl WalletAppState {
    /// Create handlers on demand from the shared state.
    pub fn create_setup_intent_handler(&self) -> CreateSetupIntentHandler {
        CreateSetupIntentHandler::new(
            self.payment_provider.clone(),
            self.document_store.clone(),
        )
    }

    pub fn store_payment_method_handler(&self) -> StorePaymentMethodHandler {
        StorePaymentMethodHandler::new(
            self.payment_provider.clone(),
            self.document_store.clone(),
        )
    }

    pub fn pay_with_saved_card_handler(&self) -> PayWithSavedCardHandler {
        PayWithSavedCardHandler::new(
            self.payment_provider.clone(),
            self.default_currency.clone(),
        )
    }

    pub fn delete_card_handler(&self) -> DeleteCardHandler {
        DeleteCardHandler::new(
            self.payment_provider.clone(),
            self.document_store.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/create-setup-intent - Find or create the customer and open a setup intent
pub async fn create_setup_intent(
    State(state): State<WalletAppState>,
    payload: Result<Json<CreateSetupIntentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, WalletApiError> {
    let Json(request) = payload?;
    let cmd = request.into_command()?;

    let handler = state.create_setup_intent_handler();
    let result = handler.handle(cmd).await?;

    Ok(Json(SetupIntentResponse::from(result)))
}

/// POST /api/store-payment-method - Record a card's display fields for a user
pub async fn store_payment_method(
    State(state): State<WalletAppState>,
    payload: Result<Json<StorePaymentMethodRequest>, JsonRejection>,
) -> Result<impl IntoResponse, WalletApiError> {
    let Json(request) = payload?;
    let cmd = request.into_command()?;

    let handler = state.store_payment_method_handler();
    handler.handle(cmd).await?;

    Ok(Json(SavedResponse { saved: true }))
}

/// POST /api/pay-with-saved-card - Charge a saved card off-session
pub async fn pay_with_saved_card(
    State(state): State<WalletAppState>,
    payload: Result<Json<PayWithSavedCardRequest>, JsonRejection>,
) -> Result<impl IntoResponse, WalletApiError> {
    let Json(request) = payload?;
    let cmd = request.into_command()?;

    let handler = state.pay_with_saved_card_handler();
    let result = handler.handle(cmd).await?;

    Ok(Json(ChargeResponse::from(result)))
}

/// POST /api/delete-card - Remove a saved card from the store and the provider
pub async fn delete_card(
    State(state): State<WalletAppState>,
    payload: Result<Json<DeleteCardRequest>, JsonRejection>,
) -> Result<impl IntoResponse, WalletApiError> {
    let Json(request) = payload?;
    let cmd = request.into_command()?;

    let handler = state.delete_card_handler();
    handler.handle(cmd).await?;

    Ok(Json(DeletedResponse { deleted: true }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts wallet errors to HTTP responses.
#[derive(Debug)]
pub struct WalletApiError(WalletError);

impl From<WalletError> for WalletApiError {
    fn from(err: WalletError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for WalletApiError {
    fn from(err: ValidationError) -> Self {
        Self(WalletError::from(err))
    }
}

impl From<JsonRejection> for WalletApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(WalletError::validation("body", rejection.body_text()))
    }
}

/// HTTP status for each error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorCode::PaymentMethodConflict => StatusCode::CONFLICT,
        ErrorCode::UnsupportedPaymentMethod => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::CardDeclined | ErrorCode::AuthenticationRequired => {
            StatusCode::PAYMENT_REQUIRED
        }
        ErrorCode::ProviderResourceNotFound => StatusCode::NOT_FOUND,
        ErrorCode::ProviderInvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::ProviderRateLimited => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::PaymentProviderError | ErrorCode::DocumentStoreError => StatusCode::BAD_GATEWAY,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for WalletApiError {
    fn into_response(self) -> axum::response::Response {
        let code = self.0.code();
        let status = status_for(code);

        if status.is_server_error() {
            tracing::error!(code = %code, error = %self.0, "Request failed");
        } else {
            tracing::info!(code = %code, error = %self.0, "Request rejected");
        }

        let details = match &self.0 {
            WalletError::ValidationFailed { field, .. } => Some(json!({ "field": field })),
            other => other.details().cloned(),
        };

        let body = match details {
            Some(details) => ErrorResponse::with_details(code.to_string(), self.0.message(), details),
            None => ErrorResponse::new(code.to_string(), self.0.message()),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::PaymentMethodId;
    use axum::body::to_bytes;

    async fn body_json(err: WalletError) -> (StatusCode, serde_json::Value) {
        let response = WalletApiError::from(err).into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn status_mapping_covers_every_category() {
        assert_eq!(status_for(ErrorCode::ValidationFailed), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorCode::PaymentMethodConflict), StatusCode::CONFLICT);
        assert_eq!(
            status_for(ErrorCode::UnsupportedPaymentMethod),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_for(ErrorCode::CardDeclined), StatusCode::PAYMENT_REQUIRED);
        assert_eq!(
            status_for(ErrorCode::AuthenticationRequired),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(status_for(ErrorCode::ProviderResourceNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorCode::ProviderInvalidRequest), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(ErrorCode::ProviderRateLimited),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(status_for(ErrorCode::PaymentProviderError), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(ErrorCode::DocumentStoreError), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status_for(ErrorCode::InternalError),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn conflict_envelope() {
        let err = WalletError::payment_method_conflict(PaymentMethodId::new("pm_1").unwrap());

        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            body,
            json!({
                "error": "Payment method is attached to a different customer.",
                "code": "PAYMENT_METHOD_CONFLICT"
            })
        );
    }

    #[tokio::test]
    async fn validation_envelope_names_field() {
        let err = WalletError::from(ValidationError::empty_field("uid"));

        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_FAILED");
        assert_eq!(body["details"]["field"], "uid");
    }

    #[tokio::test]
    async fn payment_failure_envelope_carries_details() {
        let err = WalletError::payment_failed(ErrorCode::CardDeclined, "Your card was declined.")
            .with_details(json!({ "declineCode": "generic_decline" }));

        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
        assert_eq!(body["error"], "Your card was declined.");
        assert_eq!(body["details"]["declineCode"], "generic_decline");
    }
}
