//! Card Relay - saved-card payments between Stripe and a Firebase Realtime Database
//!
//! The service exposes four JSON endpoints that provision a Stripe customer
//! per user, record card display fields in the user's database, charge saved
//! cards off-session and remove cards again.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `log_level` when set.
pub fn init_tracing(log_level: &str, json: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
