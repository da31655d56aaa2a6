//! StorePaymentMethodHandler - Command handler for recording a saved card.

use std::sync::Arc;

use crate::domain::foundation::{PaymentMethodId, UserId};
use crate::domain::wallet::{CardMetadata, DatabaseUrl, DocumentPath, WalletError};
use crate::ports::{DocumentStore, PaymentProvider};

/// Command to record a payment method's display fields for a user.
#[derive(Debug, Clone)]
pub struct StorePaymentMethodCommand {
    pub user_id: UserId,
    pub payment_method_id: PaymentMethodId,
    pub database: DatabaseUrl,
}

/// Result of a recorded payment method.
#[derive(Debug, Clone)]
pub struct StorePaymentMethodResult {
    pub card: CardMetadata,
}

/// Handler for recording card metadata under `users/{uid}/stripe/cards/{pm}`.
///
/// The payment method is not checked against the user's customer; any card
/// the provider knows can be recorded for any user.
pub struct StorePaymentMethodHandler {
    payment_provider: Arc<dyn PaymentProvider>,
    document_store: Arc<dyn DocumentStore>,
}

impl StorePaymentMethodHandler {
    pub fn new(
        payment_provider: Arc<dyn PaymentProvider>,
        document_store: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            payment_provider,
            document_store,
        }
    }

    pub async fn handle(
        &self,
        cmd: StorePaymentMethodCommand,
    ) -> Result<StorePaymentMethodResult, WalletError> {
        let payment_method = self
            .payment_provider
            .get_payment_method(&cmd.payment_method_id)
            .await?;

        let card = payment_method
            .card
            .as_ref()
            .map(CardMetadata::from)
            .ok_or_else(|| WalletError::unsupported_payment_method(cmd.payment_method_id.clone()))?;

        let path = DocumentPath::card(&cmd.user_id, &cmd.payment_method_id);
        let value = serde_json::to_value(&card)
            .map_err(|e| WalletError::infrastructure(e.to_string()))?;
        self.document_store.put(&cmd.database, &path, &value).await?;

        tracing::info!(
            user_id = %cmd.user_id,
            payment_method_id = %cmd.payment_method_id,
            brand = %card.brand,
            "Card stored"
        );

        Ok(StorePaymentMethodResult { card })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::firebase::{InMemoryDocumentStore, StoreOperation};
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::domain::foundation::ErrorCode;
    use crate::ports::{PaymentMethod, StoreError};
    use serde_json::json;

    fn database() -> DatabaseUrl {
        DatabaseUrl::parse("https://relay-test.firebaseio.com").unwrap()
    }

    fn command(pm: &str) -> StorePaymentMethodCommand {
        StorePaymentMethodCommand {
            user_id: UserId::new("user-123").unwrap(),
            payment_method_id: PaymentMethodId::new(pm).unwrap(),
            database: database(),
        }
    }

    fn card_path(pm: &str) -> DocumentPath {
        DocumentPath::card(
            &UserId::new("user-123").unwrap(),
            &PaymentMethodId::new(pm).unwrap(),
        )
    }

    fn setup() -> (
        StorePaymentMethodHandler,
        Arc<MockPaymentProvider>,
        Arc<InMemoryDocumentStore>,
    ) {
        let provider = Arc::new(MockPaymentProvider::new());
        let store = Arc::new(InMemoryDocumentStore::new());
        let handler = StorePaymentMethodHandler::new(provider.clone(), store.clone());
        (handler, provider, store)
    }

    #[tokio::test]
    async fn writes_card_metadata_under_user() {
        let (handler, provider, store) = setup();
        provider.add_card("pm_visa", "visa", "4242", 12, 2030);

        let result = handler.handle(command("pm_visa")).await.unwrap();

        assert_eq!(result.card.last4, "4242");
        assert_eq!(
            store.value_at(&database(), &card_path("pm_visa")).await,
            Some(json!({
                "brand": "visa",
                "last4": "4242",
                "expMonth": 12,
                "expYear": 2030
            }))
        );
    }

    #[tokio::test]
    async fn overwrites_existing_entry() {
        let (handler, provider, store) = setup();
        provider.add_card("pm_visa", "visa", "4242", 1, 2031);
        store
            .seed(&database(), &card_path("pm_visa"), json!({ "brand": "stale" }))
            .await;

        handler.handle(command("pm_visa")).await.unwrap();

        let stored = store.value_at(&database(), &card_path("pm_visa")).await.unwrap();
        assert_eq!(stored["brand"], "visa");
        assert_eq!(stored["expMonth"], 1);
    }

    #[tokio::test]
    async fn rejects_payment_method_without_card() {
        let (handler, provider, store) = setup();
        provider.add_payment_method(PaymentMethod {
            id: PaymentMethodId::new("pm_sepa").unwrap(),
            customer: None,
            card: None,
        });

        let err = handler.handle(command("pm_sepa")).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::UnsupportedPaymentMethod);
        assert_eq!(store.document_count().await, 0);
    }

    #[tokio::test]
    async fn unknown_payment_method_is_not_found() {
        let (handler, _provider, store) = setup();

        let err = handler.handle(command("pm_missing")).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::ProviderResourceNotFound);
        assert_eq!(store.document_count().await, 0);
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let (handler, provider, store) = setup();
        provider.add_card("pm_visa", "visa", "4242", 12, 2030);
        store
            .fail_on(
                StoreOperation::Put,
                StoreError::Status {
                    path: card_path("pm_visa").to_string(),
                    status: 401,
                },
            )
            .await;

        let err = handler.handle(command("pm_visa")).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::DocumentStoreError);
    }
}
