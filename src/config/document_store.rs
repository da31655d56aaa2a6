//! Document store configuration (Firebase Realtime Database)

use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;
use crate::adapters::firebase::FirebaseConfig;
use crate::domain::wallet::DatabaseUrl;

/// Document store configuration
///
/// The database is named by each request. A token, when set, belongs to the
/// one database in `database_url` and is never sent anywhere else.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentStoreConfig {
    /// Token sent as the `auth` query parameter
    pub auth_token: Option<SecretString>,

    /// Root URL of the database `auth_token` grants access to
    pub database_url: Option<String>,

    /// Timeout for each database request, in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

impl DocumentStoreConfig {
    /// Adapter configuration for the Firebase client
    pub fn firebase_config(&self) -> Result<FirebaseConfig, ValidationError> {
        let config =
            FirebaseConfig::new().with_timeout(Duration::from_secs(self.http_timeout_secs));
        match &self.auth_token {
            Some(token) => Ok(config.with_auth_token(token.clone(), self.token_database()?)),
            None => Ok(config),
        }
    }

    fn token_database(&self) -> Result<DatabaseUrl, ValidationError> {
        let raw = self
            .database_url
            .as_deref()
            .ok_or(ValidationError::MissingRequired("document_store.database_url"))?;
        DatabaseUrl::parse(raw).map_err(|_| ValidationError::InvalidDatabaseUrl(raw.to_string()))
    }

    /// Validate document store configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.http_timeout_secs == 0 {
            return Err(ValidationError::InvalidClientTimeout("document_store"));
        }
        if self.auth_token.is_some() {
            self.token_database()?;
        }
        Ok(())
    }
}

impl Default for DocumentStoreConfig {
    fn default() -> Self {
        Self {
            auth_token: None,
            database_url: None,
            http_timeout_secs: default_http_timeout(),
        }
    }
}

fn default_http_timeout() -> u64 {
    10
}
