//! Swipey Core - Shared types library.
//!
//! This crate provides common types used across all Swipey components:
//! - `client` - API client, persisted stores and the swipe interpreter
//! - `cli` - Command-line front end over the client
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, products, swipe decisions and order records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
