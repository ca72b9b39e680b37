//! REST client for the Swipey storefront backend.
//!
//! # Architecture
//!
//! - `reqwest` for HTTP, JSON bodies in both directions
//! - The backend is the source of truth for products; nothing here mutates them
//! - In-memory caching via `moka` for product listings (5 minute TTL)
//! - No retries: callers decide whether a failure is shown or swallowed
//!
//! # Endpoints
//!
//! ## Discovery
//! - Product listing, search and the paginated feed
//! - Swipe, view and click telemetry
//!
//! ## Checkout
//! - Cart and order endpoints. These are a published contract the backend
//!   does not fully serve yet; they are kept so the client is ready when it does.
//!
//! ## Dashboard
//! - CRUD over the brand's product catalogue, plus summary metrics
//!
//! # Example
//!
//! ```rust,ignore
//! use swipey_client::api::ApiClient;
//!
//! let client = ApiClient::new(&config)?;
//! let page = client.get_feed(None, 20).await?;
//! client.register_swipe(&page.products[0].id, true).await?;
//! ```

mod cache;
pub mod conversions;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use swipey_core::{
    Order, OrderId, OrderReceipt, OrderRequest, Product, ProductId, ProductInput, ProductPatch,
    SwipeDecision,
};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::ClientConfig;

use cache::{CacheKey, CacheValue};
use conversions::{convert_product, convert_products};
use types::{
    AddToCartRequest, ClickRequest, ErrorBody, NextProductResponse, OrderHistory, RawListing,
    RawProduct, StatusResponse, SwipeRequest, UpdateCartRequest, ViewRequest,
};

pub use types::{CartMutation, DashboardSummary, FeedPage, RemoteCart, RemoteCartItem};

/// How many products `get_product` scans when looking up a single id.
const PRODUCT_LOOKUP_LIMIT: usize = 100;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("HTTP {status} {message}")]
    Status { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ApiError {
    /// HTTP status code, if the backend answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the storefront REST API.
///
/// Cheap to clone; clones share the connection pool and cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(100)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_base_url.clone(),
                cache,
            }),
        })
    }

    /// The base URL every endpoint is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build an endpoint URL from path segments, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Url(format!("{} cannot be a base", self.inner.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.inner.client.request(method, url)
    }

    /// Send a request and decode its JSON body.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .or_else(|| status.canonical_reason().map(String::from))
                .unwrap_or_else(|| "Request failed".to_string());
            tracing::error!(
                url = %url,
                status = status.as_u16(),
                message = %message,
                "API request failed"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        // Empty 2xx bodies decode as JSON null
        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str(body).map_err(|e| {
            tracing::error!(
                url = %url,
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse API response"
            );
            ApiError::Parse(e)
        })
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        self.execute(self.request(Method::GET, url)).await
    }

    async fn send_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute(self.request(method, url).json(body)).await
    }

    async fn delete<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        self.execute(self.request(Method::DELETE, url)).await
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// List products with limit/offset pagination.
    ///
    /// Zero values are left out of the query, as the backend treats a missing
    /// parameter as "use the default".
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn get_products(&self, limit: usize, offset: usize) -> Result<Vec<Product>, ApiError> {
        let key = CacheKey::Products { limit, offset };
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let mut url = self.url(&["products"])?;
        {
            let mut query = url.query_pairs_mut();
            if limit > 0 {
                query.append_pair("limit", &limit.to_string());
            }
            if offset > 0 {
                query.append_pair("offset", &offset.to_string());
            }
        }
        strip_empty_query(&mut url);

        let listing: RawListing = self.get(url).await?;
        let products = convert_products(listing.into_parts().0);

        self.inner
            .cache
            .insert(key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Look up a single product by `id` or `external_id`.
    ///
    /// The backend has no single-product endpoint, so this scans the first
    /// page of the bulk listing.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if no product matches.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.get_products(PRODUCT_LOOKUP_LIMIT, 0)
            .await?
            .into_iter()
            .find(|p| p.matches_id(id))
            .ok_or_else(|| ApiError::NotFound(format!("Product not found: {id}")))
    }

    /// Full-text product search.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        let mut url = self.url(&["products", "search"])?;
        url.query_pairs_mut().append_pair("q", query);
        let listing: RawListing = self.get(url).await?;
        Ok(convert_products(listing.into_parts().0))
    }

    // =========================================================================
    // Feed & Swipe Methods
    // =========================================================================

    /// Fetch one page of the discovery feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn get_feed(&self, cursor: Option<&str>, limit: usize) -> Result<FeedPage, ApiError> {
        let mut url = self.url(&["feed"])?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(cursor) = cursor {
                query.append_pair("cursor", cursor);
            }
            query.append_pair("limit", &limit.to_string());
        }

        let listing: RawListing = self.get(url).await?;
        let (products, next_cursor) = listing.into_parts();
        Ok(FeedPage {
            products: convert_products(products),
            next_cursor,
        })
    }

    /// Ask the recommender for the single next best product.
    ///
    /// Returns `None` when the backend has nothing left to recommend.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn get_next_product(&self) -> Result<Option<Product>, ApiError> {
        let response: NextProductResponse = self.get(self.url(&["next-product"])?).await?;
        if response.product.is_none()
            && let Some(message) = &response.message
        {
            debug!(message = %message, "No next product");
        }
        Ok(response.product.map(|raw| convert_product(raw, 0)))
    }

    /// Record a like or dislike for a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn register_swipe(&self, product_id: &ProductId, liked: bool) -> Result<(), ApiError> {
        let body = SwipeRequest { product_id, liked };
        let _: Option<StatusResponse> = self
            .send_json(Method::POST, self.url(&["register-swipe"])?, &body)
            .await?;
        Ok(())
    }

    /// Record a swipe decision.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn record_swipe(
        &self,
        product_id: &ProductId,
        decision: SwipeDecision,
    ) -> Result<(), ApiError> {
        self.register_swipe(product_id, decision.is_like()).await
    }

    /// Record how long a product card was on screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn record_view(&self, product_id: &ProductId, duration: Duration) -> Result<(), ApiError> {
        let body = ViewRequest {
            product_id,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        };
        let _: Option<serde_json::Value> = self
            .send_json(Method::POST, self.url(&["views"])?, &body)
            .await?;
        Ok(())
    }

    /// Record a click on part of a product card.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn record_click(&self, product_id: &ProductId, target: &str) -> Result<(), ApiError> {
        let body = ClickRequest { product_id, target };
        let _: Option<serde_json::Value> = self
            .send_json(Method::POST, self.url(&["clicks"])?, &body)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Cart Methods (pending backend support)
    // =========================================================================

    /// Fetch the server-side cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn get_cart(&self) -> Result<RemoteCart, ApiError> {
        self.get(self.url(&["cart"])?).await
    }

    /// Add a product to the server-side cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_to_cart(&self, product_id: &ProductId, quantity: u32) -> Result<CartMutation, ApiError> {
        let body = AddToCartRequest {
            product_id,
            quantity,
        };
        self.send_json(Method::POST, self.url(&["cart"])?, &body).await
    }

    /// Set the quantity of a server-side cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn update_cart_item(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<CartMutation, ApiError> {
        let body = UpdateCartRequest { quantity };
        self.send_json(Method::PUT, self.url(&["cart", product_id.as_str()])?, &body)
            .await
    }

    /// Remove a line from the server-side cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_cart_item(&self, product_id: &ProductId) -> Result<CartMutation, ApiError> {
        self.delete(self.url(&["cart", product_id.as_str()])?).await
    }

    /// Empty the server-side cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn clear_remote_cart(&self) -> Result<CartMutation, ApiError> {
        self.delete(self.url(&["cart"])?).await
    }

    // =========================================================================
    // Order Methods (pending backend support)
    // =========================================================================

    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self, order), fields(items = order.items.len()))]
    pub async fn create_order(&self, order: &OrderRequest) -> Result<OrderReceipt, ApiError> {
        self.send_json(Method::POST, self.url(&["orders"])?, order)
            .await
    }

    /// Fetch one order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: &OrderId) -> Result<Order, ApiError> {
        self.get(self.url(&["orders", order_id.as_str()])?).await
    }

    /// Fetch the user's order history.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn get_order_history(&self) -> Result<Vec<Order>, ApiError> {
        let history: OrderHistory = self.get(self.url(&["orders"])?).await?;
        Ok(history.orders)
    }

    // =========================================================================
    // Dashboard Methods
    // =========================================================================

    /// List every product in the brand's catalogue.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn list_dashboard_products(&self) -> Result<Vec<Product>, ApiError> {
        let key = CacheKey::DashboardProducts;
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for dashboard products");
            return Ok(products);
        }

        let listing: RawListing = self.get(self.url(&["dashboard", "products"])?).await?;
        let products = convert_products(listing.into_parts().0);

        self.inner
            .cache
            .insert(key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Fetch one catalogue product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_dashboard_product(&self, product_id: &ProductId) -> Result<Product, ApiError> {
        let raw: RawProduct = self
            .get(self.url(&["dashboard", "products", product_id.as_str()])?)
            .await?;
        Ok(convert_product(raw, 0))
    }

    /// Create a catalogue product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_product(&self, input: &ProductInput) -> Result<Product, ApiError> {
        let raw: RawProduct = self
            .send_json(Method::POST, self.url(&["dashboard", "products"])?, input)
            .await?;
        self.inner.cache.invalidate_all();
        Ok(convert_product(raw, 0))
    }

    /// Update a catalogue product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self, patch), fields(product_id = %product_id))]
    pub async fn update_product(
        &self,
        product_id: &ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, ApiError> {
        let raw: RawProduct = self
            .send_json(
                Method::PUT,
                self.url(&["dashboard", "products", product_id.as_str()])?,
                patch,
            )
            .await?;
        self.inner.cache.invalidate_all();
        Ok(convert_product(raw, 0))
    }

    /// Delete a catalogue product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn delete_product(&self, product_id: &ProductId) -> Result<(), ApiError> {
        let _: Option<serde_json::Value> = self
            .delete(self.url(&["dashboard", "products", product_id.as_str()])?)
            .await?;
        self.inner.cache.invalidate_all();
        Ok(())
    }

    /// Fetch dashboard headline metrics.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn get_dashboard_summary(&self) -> Result<DashboardSummary, ApiError> {
        self.get(self.url(&["dashboard", "summary"])?).await
    }
}

/// `query_pairs_mut` leaves a bare `?` behind when nothing was appended.
fn strip_empty_query(url: &mut Url) {
    if url.query() == Some("") {
        url.set_query(None);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use std::path::PathBuf;

    fn client_for(server: &Server) -> ApiClient {
        let base = Url::parse(&format!("{}/api", server.url())).unwrap();
        ApiClient::new(&ClientConfig::new(base, PathBuf::from("/unused"))).unwrap()
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Status {
            status: 503,
            message: "Service Unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503 Service Unavailable");
        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test]
    async fn test_url_encodes_path_segments() {
        let server = Server::new_async().await;
        let client = client_for(&server);
        let url = client.url(&["dashboard", "products", "a/b c"]).unwrap();
        assert!(url.path().ends_with("/api/dashboard/products/a%2Fb%20c"));
    }

    #[tokio::test]
    async fn test_get_products_omits_zero_params_and_normalizes() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/products")
            .match_query(Matcher::Missing)
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_body(r#"{"products": [{"id": 1, "name": "Lumen Linen Shirt", "price": 78.0}]}"#)
            .create_async()
            .await;

        let products = client_for(&server).get_products(0, 0).await.unwrap();

        mock.assert_async().await;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id.as_str(), "1");
        assert_eq!(products[0].price.display(), "$78.00");
    }

    #[tokio::test]
    async fn test_get_products_is_cached() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/products")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("limit".into(), "5".into()),
                Matcher::UrlEncoded("offset".into(), "10".into()),
            ]))
            .with_status(200)
            .with_body(r#"[{"id": 1}]"#)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        client.get_products(5, 10).await.unwrap();
        client.get_products(5, 10).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_carries_server_error_message() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/feed")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body(r#"{"error": "database unavailable"}"#)
            .create_async()
            .await;

        let err = client_for(&server).get_feed(None, 20).await.unwrap_err();
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "database unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_success_falls_back_to_reason_phrase() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/cart")
            .with_status(404)
            .with_body("<html>nope</html>")
            .create_async()
            .await;

        let err = client_for(&server).get_cart().await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 404 Not Found");
    }

    #[tokio::test]
    async fn test_get_feed_sends_cursor_and_limit() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/feed")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("cursor".into(), "abc".into()),
                Matcher::UrlEncoded("limit".into(), "2".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"products": [{"id": 3}, {"id": 4}], "next_cursor": "def"}"#)
            .create_async()
            .await;

        let page = client_for(&server).get_feed(Some("abc"), 2).await.unwrap();

        mock.assert_async().await;
        assert_eq!(page.products.len(), 2);
        assert_eq!(page.next_cursor.as_deref(), Some("def"));
    }

    #[tokio::test]
    async fn test_register_swipe_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/register-swipe")
            .match_body(Matcher::Json(serde_json::json!({
                "product_id": "12",
                "liked": false
            })))
            .with_status(200)
            .with_body(r#"{"status": "ok"}"#)
            .create_async()
            .await;

        client_for(&server)
            .record_swipe(&ProductId::from(12), SwipeDecision::Pass)
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_record_view_sends_milliseconds() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/views")
            .match_body(Matcher::Json(serde_json::json!({
                "product_id": "1",
                "duration_ms": 1500
            })))
            .with_status(201)
            .create_async()
            .await;

        client_for(&server)
            .record_view(&ProductId::from(1), Duration::from_millis(1500))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_next_product_none() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/next-product")
            .with_status(200)
            .with_body(r#"{"product": null, "message": "No more products available"}"#)
            .create_async()
            .await;

        assert!(client_for(&server).get_next_product().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_product_scans_bulk_listing() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/products")
            .match_query(Matcher::UrlEncoded("limit".into(), "100".into()))
            .with_status(200)
            .with_body(r#"[{"id": 1}, {"external_id": "sku-2", "name": "Tote"}]"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let found = client.get_product(&"sku-2".parse().unwrap()).await.unwrap();
        assert_eq!(found.name, "Tote");

        let missing = client.get_product(&ProductId::from(9)).await.unwrap_err();
        assert!(matches!(missing, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_product_matches_external_id_when_id_present() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/products")
            .match_query(Matcher::UrlEncoded("limit".into(), "100".into()))
            .with_status(200)
            .with_body(r#"[{"id": 4, "external_id": "sku-4", "name": "Tote"}]"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let by_sku = client.get_product(&"sku-4".parse().unwrap()).await.unwrap();
        assert_eq!(by_sku.id.as_str(), "4");
        assert_eq!(by_sku.name, "Tote");

        let by_id = client.get_product(&ProductId::from(4)).await.unwrap();
        assert_eq!(by_id, by_sku);
    }

    #[tokio::test]
    async fn test_dashboard_mutation_invalidates_listing_cache() {
        let mut server = Server::new_async().await;
        let list = server
            .mock("GET", "/api/dashboard/products")
            .with_status(200)
            .with_body(r#"[{"id": 1, "name": "Old"}]"#)
            .expect(2)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/api/dashboard/products/1")
            .with_status(200)
            .with_body(r#"{"message": "deleted"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        client.list_dashboard_products().await.unwrap();
        client.list_dashboard_products().await.unwrap();
        client.delete_product(&ProductId::from(1)).await.unwrap();
        client.list_dashboard_products().await.unwrap();

        delete.assert_async().await;
        list.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_product_sends_numeric_price() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/dashboard/products")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "name": "Aero Knit Sneakers",
                "price": 120.0
            })))
            .with_status(201)
            .with_body(r#"{"id": 77, "name": "Aero Knit Sneakers", "price": 120}"#)
            .create_async()
            .await;

        let input = ProductInput {
            name: "Aero Knit Sneakers".to_string(),
            description: "Lightweight knit sneakers".to_string(),
            price: rust_decimal::Decimal::new(120, 0),
            category: "Shoes".to_string(),
            image_url: "https://img.example/sneakers.jpg".to_string(),
            tags: vec!["sporty".to_string()],
        };
        let created = client_for(&server).create_product(&input).await.unwrap();

        mock.assert_async().await;
        assert_eq!(created.id.as_str(), "77");
    }

    #[tokio::test]
    async fn test_dashboard_summary() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/dashboard/summary")
            .with_status(200)
            .with_body(r#"{"daily_users": 1280, "revenue": 48200, "conversion_rate": 3.4}"#)
            .create_async()
            .await;

        let summary = client_for(&server).get_dashboard_summary().await.unwrap();
        assert_eq!(summary.daily_users, 1280);
        assert_eq!(summary.revenue, rust_decimal::Decimal::new(48200, 0));
    }

    #[tokio::test]
    async fn test_search_products_sends_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/products/search")
            .match_query(Matcher::UrlEncoded("q".into(), "linen shirt".into()))
            .with_status(200)
            .with_body(r#"{"products": [{"id": 7, "title": "Linen Shirt"}]}"#)
            .create_async()
            .await;

        let found = client_for(&server).search_products("linen shirt").await.unwrap();

        mock.assert_async().await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Linen Shirt");
    }

    #[tokio::test]
    async fn test_record_click_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/clicks")
            .match_body(Matcher::Json(serde_json::json!({
                "product_id": "5",
                "target": "image"
            })))
            .with_status(200)
            .with_body(r#"{"status": "success"}"#)
            .create_async()
            .await;

        client_for(&server)
            .record_click(&ProductId::from(5), "image")
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_remote_cart_mutations() {
        let mut server = Server::new_async().await;
        let cart_body = r#"{"success": true, "cart": {"items": [{"product_id": "sku/7", "quantity": 2}], "total": 40.0}}"#;
        let add = server
            .mock("POST", "/api/cart")
            .match_body(Matcher::Json(serde_json::json!({
                "product_id": "sku/7",
                "quantity": 2
            })))
            .with_status(200)
            .with_body(cart_body)
            .create_async()
            .await;
        let update = server
            .mock("PUT", "/api/cart/sku%2F7")
            .match_body(Matcher::Json(serde_json::json!({ "quantity": 3 })))
            .with_status(200)
            .with_body(r#"{"success": true}"#)
            .create_async()
            .await;
        let remove = server
            .mock("DELETE", "/api/cart/sku%2F7")
            .with_status(200)
            .with_body(r#"{"success": true, "cart": {"items": []}}"#)
            .create_async()
            .await;
        let clear = server
            .mock("DELETE", "/api/cart")
            .with_status(200)
            .with_body(r#"{"success": true}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let id: ProductId = "sku/7".parse().unwrap();

        let added = client.add_to_cart(&id, 2).await.unwrap();
        assert!(added.success);
        let cart = added.cart.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].product_id, id);
        assert_eq!(cart.items[0].quantity, 2);
        assert_eq!(cart.total, Some(rust_decimal::Decimal::new(40, 0)));

        assert!(client.update_cart_item(&id, 3).await.unwrap().success);
        let removed = client.remove_cart_item(&id).await.unwrap();
        assert!(removed.cart.unwrap().items.is_empty());
        assert!(client.clear_remote_cart().await.unwrap().success);

        add.assert_async().await;
        update.assert_async().await;
        remove.assert_async().await;
        clear.assert_async().await;
    }

    #[tokio::test]
    async fn test_order_history_and_single_order() {
        let mut server = Server::new_async().await;
        let history = server
            .mock("GET", "/api/orders")
            .with_status(200)
            .with_body(
                r#"{"orders": [
                    {"order_id": "ord-1", "items": [{"product_id": 3, "quantity": 1}],
                     "total": 78.0, "status": "shipped", "created_at": "2024-05-01T10:00:00Z"},
                    {"order_id": "ord-2", "total": 12.5, "status": "pending",
                     "created_at": "2024-05-02T10:00:00Z"}
                ]}"#,
            )
            .create_async()
            .await;
        let single = server
            .mock("GET", "/api/orders/ord-1")
            .with_status(200)
            .with_body(
                r#"{"order_id": "ord-1", "items": [{"product_id": "3", "quantity": 1}],
                    "total": 78.0, "status": "shipped", "created_at": "2024-05-01T10:00:00Z"}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let orders = client.get_order_history().await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].order_id.as_str(), "ord-1");
        assert_eq!(orders[0].items[0].product_id, ProductId::from(3));
        assert!(orders[1].items.is_empty());
        assert_eq!(orders[1].total, rust_decimal::Decimal::new(125, 1));

        let order = client.get_order(&"ord-1".parse().unwrap()).await.unwrap();
        assert_eq!(order, orders[0]);

        history.assert_async().await;
        single.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_dashboard_product_encodes_id() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/dashboard/products/sku%2F9")
            .with_status(200)
            .with_body(r#"{"external_id": "sku/9", "name": "Canvas Tote", "price": 24}"#)
            .create_async()
            .await;

        let product = client_for(&server)
            .get_dashboard_product(&"sku/9".parse().unwrap())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(product.id.as_str(), "sku/9");
        assert_eq!(product.name, "Canvas Tote");
        assert_eq!(product.price.amount, rust_decimal::Decimal::new(24, 0));
    }
}
