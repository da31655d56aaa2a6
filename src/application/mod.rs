//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::wallet::{
    CreateSetupIntentCommand, CreateSetupIntentHandler, CreateSetupIntentResult,
    DeleteCardCommand, DeleteCardHandler, PayWithSavedCardCommand, PayWithSavedCardHandler,
    PayWithSavedCardResult, StorePaymentMethodCommand, StorePaymentMethodHandler,
    StorePaymentMethodResult,
};
