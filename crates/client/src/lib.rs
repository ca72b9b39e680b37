//! Swipey storefront client library.
//!
//! The client core behind the swipe storefront: a REST client for the
//! backend, persisted cart/feed/profile stores, the swipe gesture
//! interpreter and the discovery session that ties them together.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod discover;
pub mod error;
pub mod gesture;
pub mod state;
pub mod storage;
pub mod stores;
pub mod telemetry;

pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use state::ClientState;
