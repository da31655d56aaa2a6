//! Firebase Realtime Database REST adapter.
//!
//! Implements `DocumentStore` over the database's REST API:
//! - `GET {path}.json` with `X-Firebase-ETag: true` to obtain a revision tag
//! - `PUT {path}.json`, optionally with `if-match` (HTTP 412 on mismatch)
//! - `DELETE {path}.json`
//!
//! An auth token is bound to one database. It is sent as the `auth` query
//! parameter only to URLs with that database's origin, and stripped from
//! every error message. Caller-named databases elsewhere are accessed
//! unauthenticated.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;

use crate::domain::wallet::{DatabaseUrl, DocumentPath};
use crate::ports::{ConditionalWrite, DocumentStore, Snapshot, StoreError};

/// Header asking the database to return a revision tag.
const ETAG_REQUEST_HEADER: &str = "X-Firebase-ETag";

/// Database secret or ID token together with the database it belongs to.
#[derive(Clone)]
struct DatabaseCredential {
    token: SecretString,
    database: DatabaseUrl,
}

impl DatabaseCredential {
    fn applies_to(&self, db: &DatabaseUrl) -> bool {
        self.database.as_url().origin() == db.as_url().origin()
    }
}

/// Firebase REST configuration.
#[derive(Clone)]
pub struct FirebaseConfig {
    /// Credential appended as `?auth=` for its own database only.
    credential: Option<DatabaseCredential>,

    /// Timeout for each database request.
    timeout: Duration,
}

impl FirebaseConfig {
    pub fn new() -> Self {
        Self {
            credential: None,
            timeout: Duration::from_secs(10),
        }
    }

    /// Authenticate requests to `database` with `token`.
    pub fn with_auth_token(mut self, token: SecretString, database: DatabaseUrl) -> Self {
        self.credential = Some(DatabaseCredential { token, database });
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Document store backed by a Firebase Realtime Database.
pub struct FirebaseDocumentStore {
    config: FirebaseConfig,
    http_client: reqwest::Client,
}

impl FirebaseDocumentStore {
    pub fn new(config: FirebaseConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn url(&self, db: &DatabaseUrl, path: &DocumentPath) -> Url {
        let mut url = db.document_url(path);
        match &self.config.credential {
            Some(credential) if credential.applies_to(db) => {
                url.query_pairs_mut()
                    .append_pair("auth", credential.token.expose_secret());
            }
            Some(_) => {
                tracing::debug!(database = %db, "Database is not the configured one, sending no credential");
            }
            None => {}
        }
        url
    }

    async fn send(
        &self,
        path: &DocumentPath,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, StoreError> {
        request.send().await.map_err(|e| {
            let err = StoreError::Network {
                path: path.to_string(),
                message: e.without_url().to_string(),
            };
            tracing::error!(path = %path, error = %err, "Document store request failed");
            err
        })
    }

    async fn read_value(
        path: &DocumentPath,
        response: reqwest::Response,
    ) -> Result<Option<Value>, StoreError> {
        let body = response.text().await.map_err(|e| StoreError::Network {
            path: path.to_string(),
            message: e.without_url().to_string(),
        })?;

        let value: Value = serde_json::from_str(&body).map_err(|e| StoreError::Malformed {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        Ok(match value {
            Value::Null => None,
            value => Some(value),
        })
    }

    fn status_error(path: &DocumentPath, status: StatusCode) -> StoreError {
        let err = StoreError::Status {
            path: path.to_string(),
            status: status.as_u16(),
        };
        tracing::warn!(path = %path, status = status.as_u16(), "Document store rejected request");
        err
    }
}

fn etag_of(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(header::ETAG)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[async_trait]
impl DocumentStore for FirebaseDocumentStore {
    async fn get(&self, db: &DatabaseUrl, path: &DocumentPath) -> Result<Snapshot, StoreError> {
        let request = self
            .http_client
            .get(self.url(db, path))
            .header(ETAG_REQUEST_HEADER, "true");
        let response = self.send(path, request).await?;

        if !response.status().is_success() {
            return Err(Self::status_error(path, response.status()));
        }

        let etag = etag_of(&response);
        let value = Self::read_value(path, response).await?;

        tracing::debug!(path = %path, found = value.is_some(), "Document read");
        Ok(Snapshot::new(value, etag))
    }

    async fn put(
        &self,
        db: &DatabaseUrl,
        path: &DocumentPath,
        value: &Value,
    ) -> Result<(), StoreError> {
        let request = self.http_client.put(self.url(db, path)).json(value);
        let response = self.send(path, request).await?;

        if !response.status().is_success() {
            return Err(Self::status_error(path, response.status()));
        }

        tracing::debug!(path = %path, "Document written");
        Ok(())
    }

    async fn put_if_match(
        &self,
        db: &DatabaseUrl,
        path: &DocumentPath,
        value: &Value,
        etag: &str,
    ) -> Result<ConditionalWrite, StoreError> {
        let request = self
            .http_client
            .put(self.url(db, path))
            .header(header::IF_MATCH, etag)
            .json(value);
        let response = self.send(path, request).await?;

        if response.status() == StatusCode::PRECONDITION_FAILED {
            // The body carries the current value and the header its tag
            let current_etag = etag_of(&response);
            let current = Self::read_value(path, response).await?;
            tracing::debug!(path = %path, "Conditional write lost to a concurrent writer");
            return Ok(ConditionalWrite::Conflict(Snapshot::new(current, current_etag)));
        }

        if !response.status().is_success() {
            return Err(Self::status_error(path, response.status()));
        }

        tracing::debug!(path = %path, "Document written conditionally");
        Ok(ConditionalWrite::Written)
    }

    async fn delete(&self, db: &DatabaseUrl, path: &DocumentPath) -> Result<(), StoreError> {
        let request = self.http_client.delete(self.url(db, path));
        let response = self.send(path, request).await?;

        if !response.status().is_success() {
            return Err(Self::status_error(path, response.status()));
        }

        tracing::debug!(path = %path, "Document deleted");
        Ok(())
    }
}
