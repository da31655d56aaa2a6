//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` trait for Stripe API integration.
//! Handles customers, setup intents, payment method attachment and
//! off-session payment intents.
//!
//! # Security
//!
//! - The secret key is held in `secrecy::SecretString` and only exposed to
//!   build the basic-auth header
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new(api_key).with_timeout(Duration::from_secs(10));
//! let adapter = StripePaymentAdapter::new(config)?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::domain::foundation::{CustomerId, PaymentMethodId, ValidationError};
use crate::ports::{
    CardDetails, CreateCustomerRequest, CreatePaymentIntentRequest, CreateSetupIntentRequest,
    Customer, PaymentError, PaymentErrorCode, PaymentIntent, PaymentMethod, PaymentProvider,
    SetupIntent,
};

use super::stripe_types::{
    StripeCustomer, StripeDeletedObject, StripeErrorBody, StripePaymentIntent,
    StripePaymentMethod, StripeSetupIntent,
};

/// Default Stripe API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    /// Timeout for each Stripe request.
    timeout: Duration,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Stripe payment provider adapter.
///
/// Implements `PaymentProvider` for Stripe API integration.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    /// Create a new Stripe adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    /// Authenticate, send and decode a Stripe request.
    ///
    /// Non-success responses are decoded as Stripe error bodies and
    /// categorized; transport failures become network errors.
    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, PaymentError> {
        let response = request
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(operation, error = %e, "Stripe request failed");
                PaymentError::network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let error = match serde_json::from_str::<StripeErrorBody>(&error_text) {
                Ok(body) => body.error.into_payment_error(status.as_u16()),
                Err(_) => PaymentError::new(
                    PaymentErrorCode::ProviderError,
                    format!("Stripe API error (HTTP {}): {}", status.as_u16(), error_text),
                ),
            };

            if error.code == PaymentErrorCode::ProviderError
                || error.code == PaymentErrorCode::AuthenticationError
            {
                tracing::error!(operation, status = status.as_u16(), error = %error, "Stripe API error");
            } else {
                tracing::warn!(operation, status = status.as_u16(), error = %error, "Stripe rejected request");
            }
            return Err(error);
        }

        response.json().await.map_err(|e| {
            PaymentError::new(
                PaymentErrorCode::ProviderError,
                format!("Failed to parse Stripe response: {}", e),
            )
        })
    }
}

fn unexpected_response(err: ValidationError) -> PaymentError {
    PaymentError::new(
        PaymentErrorCode::ProviderError,
        format!("Unexpected Stripe response: {}", err),
    )
}

fn to_payment_method(pm: StripePaymentMethod) -> Result<PaymentMethod, PaymentError> {
    Ok(PaymentMethod {
        id: PaymentMethodId::new(pm.id).map_err(unexpected_response)?,
        customer: pm
            .customer
            .map(CustomerId::new)
            .transpose()
            .map_err(unexpected_response)?,
        card: pm.card.map(|card| CardDetails {
            brand: card.brand,
            last4: card.last4,
            exp_month: card.exp_month,
            exp_year: card.exp_year,
        }),
    })
}

fn to_payment_intent(pi: StripePaymentIntent) -> PaymentIntent {
    PaymentIntent {
        id: pi.id,
        status: pi.status,
        client_secret: pi.client_secret,
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<Customer, PaymentError> {
        let params = [
            ("email", request.email.clone()),
            ("metadata[user_id]", request.user_id.to_string()),
        ];

        let stripe_customer: StripeCustomer = self
            .execute(
                "create_customer",
                self.http_client.post(self.url("/v1/customers")).form(&params),
            )
            .await?;

        Ok(Customer {
            id: CustomerId::new(stripe_customer.id).map_err(unexpected_response)?,
            email: stripe_customer.email.or(Some(request.email)),
        })
    }

    async fn delete_customer(&self, customer_id: &CustomerId) -> Result<(), PaymentError> {
        let path = format!("/v1/customers/{}", customer_id);

        let deleted: StripeDeletedObject = self
            .execute("delete_customer", self.http_client.delete(self.url(&path)))
            .await?;

        if !deleted.deleted {
            return Err(PaymentError::new(
                PaymentErrorCode::ProviderError,
                format!("Stripe did not delete customer {}", deleted.id),
            ));
        }

        Ok(())
    }

    async fn create_setup_intent(
        &self,
        request: CreateSetupIntentRequest,
    ) -> Result<SetupIntent, PaymentError> {
        let params = [
            ("customer", request.customer_id.to_string()),
            ("payment_method_types[0]", "card".to_string()),
            ("usage", request.usage.as_str().to_string()),
        ];

        let setup_intent: StripeSetupIntent = self
            .execute(
                "create_setup_intent",
                self.http_client
                    .post(self.url("/v1/setup_intents"))
                    .form(&params),
            )
            .await?;

        Ok(SetupIntent {
            id: setup_intent.id,
            client_secret: setup_intent.client_secret,
            status: setup_intent.status,
        })
    }

    async fn get_payment_method(
        &self,
        payment_method_id: &PaymentMethodId,
    ) -> Result<PaymentMethod, PaymentError> {
        let path = format!("/v1/payment_methods/{}", payment_method_id);

        let pm: StripePaymentMethod = self
            .execute("get_payment_method", self.http_client.get(self.url(&path)))
            .await?;

        to_payment_method(pm)
    }

    async fn attach_payment_method(
        &self,
        payment_method_id: &PaymentMethodId,
        customer_id: &CustomerId,
    ) -> Result<PaymentMethod, PaymentError> {
        let path = format!("/v1/payment_methods/{}/attach", payment_method_id);
        let params = [("customer", customer_id.to_string())];

        let pm: StripePaymentMethod = self
            .execute(
                "attach_payment_method",
                self.http_client.post(self.url(&path)).form(&params),
            )
            .await?;

        to_payment_method(pm)
    }

    async fn detach_payment_method(
        &self,
        payment_method_id: &PaymentMethodId,
    ) -> Result<PaymentMethod, PaymentError> {
        let path = format!("/v1/payment_methods/{}/detach", payment_method_id);

        let pm: StripePaymentMethod = self
            .execute(
                "detach_payment_method",
                self.http_client.post(self.url(&path)),
            )
            .await?;

        to_payment_method(pm)
    }

    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        let params = [
            ("amount", request.amount.minor_units().to_string()),
            ("currency", request.currency.to_string()),
            ("customer", request.customer_id.to_string()),
            ("payment_method", request.payment_method_id.to_string()),
            ("off_session", request.off_session.to_string()),
            ("confirm", request.confirm.to_string()),
        ];

        let pi: StripePaymentIntent = self
            .execute(
                "create_payment_intent",
                self.http_client
                    .post(self.url("/v1/payment_intents"))
                    .form(&params),
            )
            .await?;

        Ok(to_payment_intent(pi))
    }
}
