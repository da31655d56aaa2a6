//! Email address value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::ValidationError;

/// Customer email address handed to the payment provider.
///
/// Only a shallow check is made (non-empty, one `@` with text on both
/// sides); the provider performs its own validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }
        match value.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(Self(value)),
            _ => Err(ValidationError::invalid_format(
                "email",
                "expected an address like name@example.com",
            )),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_address() {
        let email = Email::new(" buyer@example.com ").unwrap();
        assert_eq!(email.as_str(), "buyer@example.com");
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(
            Email::new("  ").unwrap_err(),
            ValidationError::empty_field("email")
        );
    }

    #[test]
    fn rejects_missing_at_sign() {
        assert!(matches!(
            Email::new("buyer.example.com"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(Email::new("@example.com").is_err());
        assert!(Email::new("buyer@").is_err());
    }
}
