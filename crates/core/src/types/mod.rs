//! Core types for Swipey.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod swipe;

pub use id::*;
pub use order::{Order, OrderLine, OrderReceipt, OrderRequest, PaymentMethod, ShippingAddress};
pub use price::{CurrencyCode, Price};
pub use product::{Product, ProductInput, ProductPatch};
pub use swipe::SwipeDecision;
