//! Payment configuration

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;
use crate::adapters::stripe::{StripeConfig, DEFAULT_API_BASE_URL};
use crate::domain::wallet::Currency;

/// Payment configuration (Stripe)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key
    pub stripe_api_key: SecretString,

    /// Stripe API endpoint (overridable for stripe-mock or tests)
    #[serde(default = "default_api_base_url")]
    pub stripe_api_base_url: String,

    /// Currency used when a charge request names none
    #[serde(default = "default_charge_currency")]
    pub charge_currency: String,

    /// Timeout for each Stripe request, in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

impl PaymentConfig {
    /// Create a configuration with defaults for everything but the key
    pub fn new(stripe_api_key: impl Into<String>) -> Self {
        Self {
            stripe_api_key: SecretString::new(stripe_api_key.into()),
            stripe_api_base_url: default_api_base_url(),
            charge_currency: default_charge_currency(),
            http_timeout_secs: default_http_timeout(),
        }
    }

    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_test_")
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_live_")
    }

    /// Default charge currency as a domain value
    pub fn charge_currency(&self) -> Result<Currency, ValidationError> {
        Currency::new(&self.charge_currency)
            .map_err(|_| ValidationError::InvalidChargeCurrency(self.charge_currency.clone()))
    }

    /// Adapter configuration for the Stripe client
    pub fn stripe_config(&self) -> StripeConfig {
        StripeConfig::new(self.stripe_api_key.clone())
            .with_base_url(self.stripe_api_base_url.clone())
            .with_timeout(Duration::from_secs(self.http_timeout_secs))
    }

    /// Validate payment configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let key = self.stripe_api_key.expose_secret();
        if key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_API_KEY"));
        }

        // Verify key prefixes for safety
        if !key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if *environment == Environment::Production && !self.is_live_mode() {
            return Err(ValidationError::LiveStripeKeyRequired);
        }

        let base_url = url::Url::parse(&self.stripe_api_base_url)
            .map_err(|_| ValidationError::InvalidStripeBaseUrl)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ValidationError::InvalidStripeBaseUrl);
        }

        self.charge_currency()?;

        if self.http_timeout_secs == 0 {
            return Err(ValidationError::InvalidClientTimeout("payment"));
        }

        Ok(())
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_charge_currency() -> String {
    "eur".to_string()
}

fn default_http_timeout() -> u64 {
    10
}
