//! CreateSetupIntentHandler - Command handler for starting card collection.
//!
//! Resolves the user's provider customer (find-or-create against the record at
//! `users/{uid}/stripe/user`) and opens an off-session setup intent for it.

use std::sync::Arc;

use crate::domain::foundation::{CustomerId, Email, UserId};
use crate::domain::wallet::{CustomerRecord, DatabaseUrl, DocumentPath, WalletError};
use crate::ports::{
    ConditionalWrite, CreateCustomerRequest, CreateSetupIntentRequest, DocumentStore,
    PaymentProvider, SetupUsage, Snapshot,
};

/// Conditional writes attempted before giving up on recording a new customer.
pub const MAX_RECORD_WRITE_ATTEMPTS: usize = 3;

/// Command to create a setup intent for a user.
#[derive(Debug, Clone)]
pub struct CreateSetupIntentCommand {
    pub user_id: UserId,
    pub email: Email,
    pub database: DatabaseUrl,
}

/// Result of successful setup intent creation.
#[derive(Debug, Clone)]
pub struct CreateSetupIntentResult {
    pub client_secret: String,
    pub customer_id: CustomerId,
}

enum RecordOutcome {
    Recorded,
    /// Another request recorded this customer first.
    Superseded(CustomerId),
}

/// Handler for creating setup intents.
pub struct CreateSetupIntentHandler {
    payment_provider: Arc<dyn PaymentProvider>,
    document_store: Arc<dyn DocumentStore>,
}

impl CreateSetupIntentHandler {
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
        cmd: CreateSetupIntentCommand,
    ) -> Result<CreateSetupIntentResult, WalletError> {
        // 1. Find or create the provider customer
        let customer_id = self.resolve_customer(&cmd).await?;

        // 2. Open a setup intent for off-session card use
        let setup_intent = self
            .payment_provider
            .create_setup_intent(CreateSetupIntentRequest {
                customer_id: customer_id.clone(),
                usage: SetupUsage::OffSession,
            })
            .await?;

        tracing::info!(
            user_id = %cmd.user_id,
            customer_id = %customer_id,
            setup_intent_id = %setup_intent.id,
            "Setup intent created"
        );

        Ok(CreateSetupIntentResult {
            client_secret: setup_intent.client_secret,
            customer_id,
        })
    }

    async fn resolve_customer(
        &self,
        cmd: &CreateSetupIntentCommand,
    ) -> Result<CustomerId, WalletError> {
        let path = DocumentPath::customer_record(&cmd.user_id);

        let snapshot = match self.document_store.get(&cmd.database, &path).await {
            Ok(snapshot) => snapshot,
            Err(err) if err.is_status() => {
                // An unreadable record is treated as absent
                tracing::warn!(
                    user_id = %cmd.user_id,
                    error = %err,
                    "Customer record read rejected, creating a new customer"
                );
                Snapshot::default()
            }
            Err(err) => return Err(err.into()),
        };

        if let Some(record) = CustomerRecord::from_value(snapshot.value.as_ref()) {
            tracing::debug!(
                user_id = %cmd.user_id,
                customer_id = %record.stripe_id,
                "Existing customer found"
            );
            return Ok(record.stripe_id);
        }

        let customer = self
            .payment_provider
            .create_customer(CreateCustomerRequest {
                user_id: cmd.user_id.clone(),
                email: cmd.email.to_string(),
            })
            .await?;

        tracing::info!(
            user_id = %cmd.user_id,
            customer_id = %customer.id,
            "Customer created"
        );

        match self.record_customer(cmd, &path, &customer.id, snapshot.etag).await {
            Ok(RecordOutcome::Recorded) => Ok(customer.id),
            Ok(RecordOutcome::Superseded(winner)) => {
                tracing::info!(
                    user_id = %cmd.user_id,
                    customer_id = %winner,
                    discarded_customer_id = %customer.id,
                    "Concurrent request recorded a customer first"
                );
                self.discard_customer(&customer.id).await;
                Ok(winner)
            }
            Err(err) => {
                // The new customer is unreferenced once recording fails
                self.discard_customer(&customer.id).await;
                Err(err)
            }
        }
    }

    /// Writes the customer record, conditionally when a revision tag is known.
    async fn record_customer(
        &self,
        cmd: &CreateSetupIntentCommand,
        path: &DocumentPath,
        customer_id: &CustomerId,
        etag: Option<String>,
    ) -> Result<RecordOutcome, WalletError> {
        let value = CustomerRecord::new(customer_id.clone()).to_value();

        let Some(mut etag) = etag else {
            self.document_store.put(&cmd.database, path, &value).await?;
            return Ok(RecordOutcome::Recorded);
        };

        for attempt in 1..=MAX_RECORD_WRITE_ATTEMPTS {
            let current = match self
                .document_store
                .put_if_match(&cmd.database, path, &value, &etag)
                .await?
            {
                ConditionalWrite::Written => return Ok(RecordOutcome::Recorded),
                ConditionalWrite::Conflict(current) => current,
            };

            if let Some(winner) = CustomerRecord::from_value(current.value.as_ref()) {
                return Ok(RecordOutcome::Superseded(winner.stripe_id));
            }

            tracing::debug!(
                user_id = %cmd.user_id,
                attempt,
                "Customer record changed without a customer, retrying write"
            );

            match current.etag {
                Some(next) => etag = next,
                None => break,
            }
        }

        Err(WalletError::document_store(format!(
            "Could not record customer for user {} after {} attempts",
            cmd.user_id, MAX_RECORD_WRITE_ATTEMPTS
        )))
    }

    /// Best-effort removal of a customer that will never be referenced.
    async fn discard_customer(&self, customer_id: &CustomerId) {
        if let Err(err) = self.payment_provider.delete_customer(customer_id).await {
            tracing::warn!(
                customer_id = %customer_id,
                error = %err,
                "Failed to delete orphaned customer"
            );
        }
    }
}
