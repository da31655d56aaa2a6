//! Addressing records in the document store.
//!
//! The caller names the database per request (`firebaseDbUrl`); records live
//! at fixed paths below it:
//!
//! - `users/{uid}/stripe/user` - the customer record
//! - `users/{uid}/stripe/cards/{paymentMethodId}` - one card's metadata

use std::fmt;

use url::Url;

use crate::domain::foundation::{PaymentMethodId, UserId, ValidationError};

/// Root URL of a caller-supplied document store database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseUrl(Url);

impl DatabaseUrl {
    /// Parses and validates a database root URL.
    ///
    /// Only absolute `http`/`https` URLs are accepted. Query and fragment are
    /// dropped.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        const FIELD: &str = "firebaseDbUrl";

        if raw.trim().is_empty() {
            return Err(ValidationError::empty_field(FIELD));
        }

        let mut url = Url::parse(raw.trim())
            .map_err(|e| ValidationError::invalid_format(FIELD, e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ValidationError::invalid_format(
                FIELD,
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(ValidationError::invalid_format(FIELD, "missing host"));
        }

        url.set_query(None);
        url.set_fragment(None);
        Ok(Self(url))
    }

    /// Renders the REST URL of a document (`{root}/{path}.json`).
    pub fn document_url(&self, path: &DocumentPath) -> Url {
        let mut url = self.0.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            if let Some((last, parents)) = path.segments.split_last() {
                segments.extend(parents);
                segments.push(&format!("{}.json", last));
            }
        }
        url
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Path of a record relative to the database root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPath {
    segments: Vec<String>,
}

impl DocumentPath {
    /// `users/{uid}/stripe/user`
    pub fn customer_record(user_id: &UserId) -> Self {
        Self {
            segments: vec![
                "users".to_string(),
                user_id.as_str().to_string(),
                "stripe".to_string(),
                "user".to_string(),
            ],
        }
    }

    /// `users/{uid}/stripe/cards/{paymentMethodId}`
    pub fn card(user_id: &UserId, payment_method_id: &PaymentMethodId) -> Self {
        Self {
            segments: vec![
                "users".to_string(),
                user_id.as_str().to_string(),
                "stripe".to_string(),
                "cards".to_string(),
                payment_method_id.as_str().to_string(),
            ],
        }
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}
