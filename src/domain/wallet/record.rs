//! The per-user customer record (`users/{uid}/stripe/user`).

use serde_json::{json, Value};

use crate::domain::foundation::CustomerId;

/// Field holding the provider customer id.
pub const STRIPE_ID_FIELD: &str = "stripeId";

/// Customer record as stored for a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRecord {
    pub stripe_id: CustomerId,
}

impl CustomerRecord {
    pub fn new(stripe_id: CustomerId) -> Self {
        Self { stripe_id }
    }

    /// Reads a record out of a raw stored value.
    ///
    /// Anything other than an object with a non-empty string `stripeId`
    /// counts as "no customer yet".
    pub fn from_value(value: Option<&Value>) -> Option<Self> {
        value
            .and_then(|v| v.get(STRIPE_ID_FIELD))
            .and_then(Value::as_str)
            .and_then(|id| CustomerId::new(id).ok())
            .map(Self::new)
    }

    /// The JSON written to the store.
    pub fn to_value(&self) -> Value {
        json!({ "stripeId": self.stripe_id.as_str() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_stripe_id_from_object() {
        let value = json!({"stripeId": "cus_123"});
        let record = CustomerRecord::from_value(Some(&value)).unwrap();
        assert_eq!(record.stripe_id.as_str(), "cus_123");
    }

    #[test]
    fn missing_value_is_no_record() {
        assert!(CustomerRecord::from_value(None).is_none());
        assert!(CustomerRecord::from_value(Some(&Value::Null)).is_none());
    }

    #[test]
    fn empty_or_non_string_id_is_no_record() {
        assert!(CustomerRecord::from_value(Some(&json!({"stripeId": ""}))).is_none());
        assert!(CustomerRecord::from_value(Some(&json!({"stripeId": 42}))).is_none());
        assert!(CustomerRecord::from_value(Some(&json!({"other": "x"}))).is_none());
    }

    #[test]
    fn writes_only_stripe_id() {
        let record = CustomerRecord::new(CustomerId::new("cus_9").unwrap());
        assert_eq!(record.to_value(), json!({"stripeId": "cus_9"}));
    }
}
