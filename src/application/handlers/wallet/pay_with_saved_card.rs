//! PayWithSavedCardHandler - Command handler for off-session charges.

use std::sync::Arc;

use crate::domain::foundation::{CustomerId, PaymentMethodId};
use crate::domain::wallet::{ChargeAmount, Currency, WalletError};
use crate::ports::{CreatePaymentIntentRequest, PaymentIntent, PaymentProvider};

/// Command to charge a saved card.
#[derive(Debug, Clone)]
pub struct PayWithSavedCardCommand {
    pub customer_id: CustomerId,
    pub payment_method_id: PaymentMethodId,
    pub amount: ChargeAmount,

    /// Falls back to the handler's default currency when absent.
    pub currency: Option<Currency>,
}

/// Result of a created payment intent.
#[derive(Debug, Clone)]
pub struct PayWithSavedCardResult {
    pub payment_intent: PaymentIntent,
}

/// Handler for charging a saved card without the customer present.
///
/// The payment method is attached to the customer first if it is not attached
/// anywhere. A method attached to another customer is refused before any
/// charge is attempted.
pub struct PayWithSavedCardHandler {
    payment_provider: Arc<dyn PaymentProvider>,
    default_currency: Currency,
}

impl PayWithSavedCardHandler {
    pub fn new(payment_provider: Arc<dyn PaymentProvider>, default_currency: Currency) -> Self {
        Self {
            payment_provider,
            default_currency,
        }
    }

    pub async fn handle(
        &self,
        cmd: PayWithSavedCardCommand,
    ) -> Result<PayWithSavedCardResult, WalletError> {
        // 1. Make sure the payment method belongs to the customer
        let payment_method = self
            .payment_provider
            .get_payment_method(&cmd.payment_method_id)
            .await?;

        match &payment_method.customer {
            None => {
                self.payment_provider
                    .attach_payment_method(&cmd.payment_method_id, &cmd.customer_id)
                    .await?;
                tracing::debug!(
                    customer_id = %cmd.customer_id,
                    payment_method_id = %cmd.payment_method_id,
                    "Payment method attached"
                );
            }
            Some(owner) if owner != &cmd.customer_id => {
                tracing::warn!(
                    customer_id = %cmd.customer_id,
                    payment_method_id = %cmd.payment_method_id,
                    "Payment method belongs to another customer"
                );
                return Err(WalletError::payment_method_conflict(cmd.payment_method_id));
            }
            Some(_) => {}
        }

        // 2. Charge off-session
        let currency = cmd
            .currency
            .unwrap_or_else(|| self.default_currency.clone());

        let result = self
            .payment_provider
            .create_payment_intent(CreatePaymentIntentRequest {
                amount: cmd.amount,
                currency: currency.clone(),
                customer_id: cmd.customer_id.clone(),
                payment_method_id: cmd.payment_method_id.clone(),
                off_session: true,
                confirm: true,
            })
            .await;

        let payment_intent = match result {
            Ok(intent) => intent,
            Err(err) => {
                tracing::warn!(
                    customer_id = %cmd.customer_id,
                    payment_method_id = %cmd.payment_method_id,
                    error = %err,
                    "Off-session charge failed"
                );
                return Err(err.into());
            }
        };

        tracing::info!(
            customer_id = %cmd.customer_id,
            payment_method_id = %cmd.payment_method_id,
            payment_intent_id = %payment_intent.id,
            amount = cmd.amount.minor_units(),
            currency = %currency,
            status = %payment_intent.status,
            "Off-session charge created"
        );

        Ok(PayWithSavedCardResult { payment_intent })
    }
}
