//! Catalogue product types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A product as shown in the feed, cart and saved lists.
///
/// Products are sourced from the backend and copied as-is into local
/// stores; the client never edits them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// Catalogue SKU some payloads carry alongside (or instead of) `id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<ProductId>,
    pub name: String,
    pub price: Price,
    /// Catalogue category (e.g. "Tops").
    pub category: String,
    /// Promotional tag such as "New Arrival" or "Best Seller".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub description: String,
    /// Image URLs, primary image first.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub style_tags: Vec<String>,
}

impl Product {
    /// The primary image URL, if the product has any images.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Whether `id` names this product, by `id` or `external_id`.
    #[must_use]
    pub fn matches_id(&self, id: &ProductId) -> bool {
        &self.id == id || self.external_id.as_ref() == Some(id)
    }
}

/// Body for creating a dashboard catalogue product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: String,
    pub image_url: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update for a dashboard catalogue product.
///
/// Only fields that are `Some` are sent. Prices go over the wire as JSON
/// numbers, matching what the dashboard endpoints return.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl ProductPatch {
    /// Returns true if the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.image_url.is_none()
            && self.tags.is_none()
    }
}
