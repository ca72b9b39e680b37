//! Client-side state stores.
//!
//! Each store is plain data plus total operations over it. Persistence is
//! layered on with [`crate::storage::PersistedStore`], so every store here
//! implements [`crate::storage::Persist`] with its storage key.

pub mod cart;
pub mod feed;
pub mod profile;

pub use cart::{Cart, CartLine};
pub use feed::{FeedHandle, FeedState, LoadOutcome, PageRequest};
pub use profile::{
    FieldError, Profile, ProfileDetails, ProfileDraft, ProfilePatch, ProfileValidationError,
    StyleOption, GENDER_OPTIONS, STYLE_OPTIONS,
};

/// Storage key of the cart store.
pub const CART_STORAGE_KEY: &str = "checkout-storage";
/// Storage key of the feed store.
pub const FEED_STORAGE_KEY: &str = "feed-storage";
/// Storage key of the profile store.
pub const PROFILE_STORAGE_KEY: &str = "profile-storage";
