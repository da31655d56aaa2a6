//! Wallet domain - a user's saved payment metadata.
//!
//! The relay keeps no state of its own. This module holds the shapes of the
//! records it reads and writes in the document store, the value objects a
//! charge is built from, and the errors the wallet operations raise.

mod card;
mod charge;
mod errors;
mod location;
mod record;

pub use card::CardMetadata;
pub use charge::{ChargeAmount, Currency, MAX_CHARGE_AMOUNT};
pub use errors::{WalletError, PAYMENT_METHOD_CONFLICT_MESSAGE};
pub use location::{DatabaseUrl, DocumentPath};
pub use record::{CustomerRecord, STRIPE_ID_FIELD};
