//! Runtime settings for the relay, read once at startup.
//!
//! Three sections, each its own module:
//!
//! - `server` - listener, stage, logging, request timeout, CORS origins
//! - `payment` - Stripe secret key, API base URL, default charge currency
//! - `document_store` - Firebase token and the database it is bound to
//!
//! Values come from `CARD_RELAY__<SECTION>__<KEY>` environment variables,
//! optionally seeded from a `.env` file. Only the Stripe key is mandatory.
//!
//! ```no_run
//! use card_relay::config::AppConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! config.validate()?;
//! println!("listening on {}", config.server.socket_addr()?);
//! # Ok(())
//! # }
//! ```

mod document_store;
mod error;
mod payment;
mod server;

pub use document_store::DocumentStoreConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// All relay settings, see [`AppConfig::load()`].
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// `CARD_RELAY__SERVER__*`
    #[serde(default)]
    pub server: ServerConfig,

    /// `CARD_RELAY__PAYMENT__*`, required for the Stripe key
    pub payment: PaymentConfig,

    /// `CARD_RELAY__DOCUMENT_STORE__*`
    #[serde(default)]
    pub document_store: DocumentStoreConfig,
}

impl AppConfig {
    /// Reads `.env` (if any) and the `CARD_RELAY__*` environment.
    ///
    /// `CARD_RELAY__PAYMENT__STRIPE_API_KEY=sk_test_...` lands in
    /// `payment.stripe_api_key`; missing sections fall back to their defaults.
    /// Fails when the Stripe key is absent or a value does not parse.
    pub fn load() -> Result<Self, ConfigError> {
        // .env is optional outside development
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CARD_RELAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Cross-checks values that deserialized fine but cannot run, such as a
    /// test Stripe key in production or a token without its database.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.payment.validate(&self.server.environment)?;
        self.document_store.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper to set environment variables for testing
    fn set_minimal_env() {
        env::set_var("CARD_RELAY__PAYMENT__STRIPE_API_KEY", "sk_test_xxx");
    }

    /// Helper to clear environment variables after testing
    fn clear_env() {
        env::remove_var("CARD_RELAY__PAYMENT__STRIPE_API_KEY");
        env::remove_var("CARD_RELAY__PAYMENT__CHARGE_CURRENCY");
        env::remove_var("CARD_RELAY__SERVER__PORT");
        env::remove_var("CARD_RELAY__SERVER__ENVIRONMENT");
        env::remove_var("CARD_RELAY__SERVER__LOG_JSON");
        env::remove_var("CARD_RELAY__DOCUMENT_STORE__AUTH_TOKEN");
        env::remove_var("CARD_RELAY__DOCUMENT_STORE__DATABASE_URL");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.payment.stripe_api_key.expose_secret(), "sk_test_xxx");
        assert_eq!(config.server.port, 3001);
        assert!(config.document_store.auth_token.is_none());
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CARD_RELAY__SERVER__PORT", "8088");
        env::set_var("CARD_RELAY__SERVER__LOG_JSON", "true");
        env::set_var("CARD_RELAY__PAYMENT__CHARGE_CURRENCY", "usd");
        env::set_var("CARD_RELAY__DOCUMENT_STORE__AUTH_TOKEN", "db-secret");
        env::set_var(
            "CARD_RELAY__DOCUMENT_STORE__DATABASE_URL",
            "https://shop.firebaseio.com",
        );
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 8088);
        assert!(config.server.log_json);
        assert_eq!(config.payment.charge_currency, "usd");
        assert!(config.validate().is_ok());
        assert_eq!(
            config.document_store.database_url.as_deref(),
            Some("https://shop.firebaseio.com")
        );
        assert_eq!(
            config.document_store.auth_token.unwrap().expose_secret(),
            "db-secret"
        );
    }

    #[test]
    fn test_missing_stripe_key_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_err());
    }

    #[test]
    fn test_production_rejects_test_key() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CARD_RELAY__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert!(matches!(
            config.validate(),
            Err(ValidationError::LiveStripeKeyRequired)
        ));
    }
}
