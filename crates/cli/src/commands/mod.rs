//! CLI command implementations.

pub mod cart;
pub mod checkout;
pub mod dashboard;
pub mod feed;
pub mod orders;
pub mod profile;
pub mod saved;
