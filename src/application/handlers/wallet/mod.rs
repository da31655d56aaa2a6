//! Wallet handlers - saved card lifecycle.
//!
//! Each handler orchestrates the payment provider and the document store for
//! one API operation.

mod create_setup_intent;
mod delete_card;
mod pay_with_saved_card;
mod store_payment_method;

pub use create_setup_intent::{
    CreateSetupIntentCommand, CreateSetupIntentHandler, CreateSetupIntentResult,
    MAX_RECORD_WRITE_ATTEMPTS,
};
pub use delete_card::{DeleteCardCommand, DeleteCardHandler};
pub use pay_with_saved_card::{
    PayWithSavedCardCommand, PayWithSavedCardHandler, PayWithSavedCardResult,
};
pub use store_payment_method::{
    StorePaymentMethodCommand, StorePaymentMethodHandler, StorePaymentMethodResult,
};
