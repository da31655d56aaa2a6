//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid HTTP client timeout for {0}")]
    InvalidClientTimeout(&'static str),

    #[error("Invalid Stripe API key format")]
    InvalidStripeKey,

    #[error("Production requires a live Stripe API key")]
    LiveStripeKeyRequired,

    #[error("Invalid Stripe API base URL")]
    InvalidStripeBaseUrl,

    #[error("Invalid charge currency: {0}")]
    InvalidChargeCurrency(String),

    #[error("Invalid document store database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("Invalid CORS origin: {0}")]
    InvalidCorsOrigin(String),
}
