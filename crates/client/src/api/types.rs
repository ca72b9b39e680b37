//! Wire types for the storefront REST API.
//!
//! Product payloads are loosely shaped (several historical field names
//! for the same thing), so they are read into [`RawProduct`] and
//! normalized into [`swipey_core::Product`] by the conversion layer.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use swipey_core::{CurrencyCode, Product, ProductId};

// =============================================================================
// Product Payloads
// =============================================================================

/// A product exactly as the backend sends it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProduct {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<ProductId>,
    #[serde(default, deserialize_with = "lenient")]
    pub external_id: Option<ProductId>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient")]
    pub currency: Option<CurrencyCode>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub brand: Option<String>,
    pub image_url: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub media: Vec<RawMedia>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub style_tags: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A media attachment on a raw product.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMedia {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub url: Option<String>,
}

/// Product listing, either a bare array or wrapped in an object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawListing {
    Bare(Vec<RawProduct>),
    Wrapped {
        #[serde(default)]
        products: Vec<RawProduct>,
        #[serde(default, alias = "cursor")]
        next_cursor: Option<String>,
    },
}

impl RawListing {
    /// Split into the products and the server-provided next cursor.
    #[must_use]
    pub fn into_parts(self) -> (Vec<RawProduct>, Option<String>) {
        match self {
            Self::Bare(products) => (products, None),
            Self::Wrapped {
                products,
                next_cursor,
            } => (products, next_cursor),
        }
    }
}

/// Response of `GET /next-product`.
#[derive(Debug, Clone, Deserialize)]
pub struct NextProductResponse {
    pub product: Option<RawProduct>,
    pub message: Option<String>,
}

/// Read any JSON value and keep it only if it converts to `T`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value::<T>(v).ok()))
}

// =============================================================================
// Feed
// =============================================================================

/// One page of the discovery feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPage {
    pub products: Vec<Product>,
    /// Opaque token for the following page, if the server issued one.
    pub next_cursor: Option<String>,
}

// =============================================================================
// Telemetry Bodies
// =============================================================================

/// Body for `POST /register-swipe`.
#[derive(Debug, Clone, Serialize)]
pub struct SwipeRequest<'a> {
    pub product_id: &'a ProductId,
    pub liked: bool,
}

/// Body for `POST /views`.
#[derive(Debug, Clone, Serialize)]
pub struct ViewRequest<'a> {
    pub product_id: &'a ProductId,
    pub duration_ms: u64,
}

/// Body for `POST /clicks`.
#[derive(Debug, Clone, Serialize)]
pub struct ClickRequest<'a> {
    pub product_id: &'a ProductId,
    pub target: &'a str,
}

/// Generic `{"status": ...}` acknowledgement.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusResponse {
    pub status: Option<String>,
}

// =============================================================================
// Remote Cart (pending backend support)
// =============================================================================

/// Server-side cart as described by the cart contract.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteCart {
    #[serde(default)]
    pub items: Vec<RemoteCartItem>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total: Option<Decimal>,
}

/// One line of a server-side cart.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteCartItem {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(default)]
    pub product_details: Option<serde_json::Value>,
}

/// Response of the cart mutation endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CartMutation {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub cart: Option<RemoteCart>,
}

/// Body for `POST /cart`.
#[derive(Debug, Clone, Serialize)]
pub struct AddToCartRequest<'a> {
    pub product_id: &'a ProductId,
    pub quantity: u32,
}

/// Body for `PUT /cart/:product_id`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateCartRequest {
    pub quantity: u32,
}

/// Response of `GET /orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderHistory {
    #[serde(default)]
    pub orders: Vec<swipey_core::Order>,
}

// =============================================================================
// Dashboard
// =============================================================================

/// Headline metrics from `GET /dashboard/summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub daily_users: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    /// Percentage, e.g. `3.4` for 3.4%
    pub conversion_rate: f64,
}

/// Error body the backend attaches to non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}
