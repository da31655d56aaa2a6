//! Domain layer - value objects and errors.
//!
//! - `foundation` - identifiers and validation errors
//! - `wallet` - card metadata, customer records, charges

pub mod foundation;
pub mod wallet;
