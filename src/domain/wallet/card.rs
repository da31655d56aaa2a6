//! Card display metadata kept in the document store.

use serde::{Deserialize, Serialize};

/// Non-sensitive card fields shown to the user for a saved payment method.
///
/// Stored under `users/{uid}/stripe/cards/{paymentMethodId}` with camelCase keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMetadata {
    /// Card brand as reported by the provider (visa, mastercard, ...).
    pub brand: String,

    /// Last four digits of the card number.
    pub last4: String,

    /// Expiry month (1-12).
    pub exp_month: u32,

    /// Four-digit expiry year.
    pub exp_year: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_store_field_names() {
        let card = CardMetadata {
            brand: "visa".to_string(),
            last4: "4242".to_string(),
            exp_month: 12,
            exp_year: 2030,
        };

        assert_eq!(
            serde_json::to_value(&card).unwrap(),
            json!({"brand": "visa", "last4": "4242", "expMonth": 12, "expYear": 2030})
        );
    }

    #[test]
    fn deserializes_stored_entry() {
        let card: CardMetadata = serde_json::from_value(
            json!({"brand": "mastercard", "last4": "4444", "expMonth": 1, "expYear": 2031}),
        )
        .unwrap();

        assert_eq!(card.brand, "mastercard");
        assert_eq!(card.exp_month, 1);
    }
}
