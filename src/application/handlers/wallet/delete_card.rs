//! DeleteCardHandler - Command handler for removing a saved card.
//!
//! The store entry is removed first and the provider detach second. If the
//! detach fails the entry is written back, so the user's card list never
//! drops a card the provider still holds.

use std::sync::Arc;

use crate::domain::foundation::{PaymentMethodId, UserId};
use crate::domain::wallet::{DatabaseUrl, DocumentPath, WalletError};
use crate::ports::{DocumentStore, PaymentProvider};

/// Command to delete a saved card.
#[derive(Debug, Clone)]
pub struct DeleteCardCommand {
    pub user_id: UserId,
    pub payment_method_id: PaymentMethodId,
    pub database: DatabaseUrl,
}

/// Handler for deleting saved cards.
pub struct DeleteCardHandler {
    payment_provider: Arc<dyn PaymentProvider>,
    document_store: Arc<dyn DocumentStore>,
}

impl DeleteCardHandler {
    pub fn new(
        payment_provider: Arc<dyn PaymentProvider>,
        document_store: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            payment_provider,
            document_store,
        }
    }

    pub async fn handle(&self, cmd: DeleteCardCommand) -> Result<(), WalletError> {
        let path = DocumentPath::card(&cmd.user_id, &cmd.payment_method_id);

        // 1. Keep the current entry for compensation
        let previous = self.document_store.get(&cmd.database, &path).await?;

        // 2. Remove it from the store
        self.document_store.delete(&cmd.database, &path).await?;

        // 3. Detach at the provider, restoring the entry on failure
        if let Err(err) = self
            .payment_provider
            .detach_payment_method(&cmd.payment_method_id)
            .await
        {
            tracing::warn!(
                user_id = %cmd.user_id,
                payment_method_id = %cmd.payment_method_id,
                error = %err,
                "Detach failed, restoring card entry"
            );

            if let Some(value) = previous.value {
                if let Err(restore_err) = self.document_store.put(&cmd.database, &path, &value).await {
                    tracing::error!(
                        user_id = %cmd.user_id,
                        payment_method_id = %cmd.payment_method_id,
                        error = %restore_err,
                        "Failed to restore card entry after detach failure"
                    );
                }
            }

            return Err(err.into());
        }

        tracing::info!(
            user_id = %cmd.user_id,
            payment_method_id = %cmd.payment_method_id,
            "Card deleted"
        );

        Ok(())
    }
}
