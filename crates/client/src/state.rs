//! Client state shared across commands.

use std::sync::Arc;

use swipey_core::{OrderReceipt, OrderRequest, PaymentMethod, Product, ProductId, ShippingAddress};
use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result, add_breadcrumb};
use crate::storage::{FileStorage, PersistedStore, StateStorage};
use crate::stores::{Cart, FeedHandle, FeedState, Profile};
use crate::telemetry::Telemetry;

/// Client state shared across the discovery loop and commands.
///
/// This struct is cheaply cloneable via `Arc` and gives access to the API
/// client, the three persisted stores and telemetry.
#[derive(Clone)]
pub struct ClientState {
    inner: Arc<ClientStateInner>,
}

struct ClientStateInner {
    config: ClientConfig,
    api: ApiClient,
    cart: Mutex<PersistedStore<Cart>>,
    profile: Mutex<PersistedStore<Profile>>,
    feed: FeedHandle,
    telemetry: Telemetry,
}

impl ClientState {
    /// Create the state with file storage in the configured data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or a store cannot
    /// be read.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let storage: Arc<dyn StateStorage> = Arc::new(FileStorage::new(&config.data_dir));
        Self::with_storage(config, storage)
    }

    /// Create the state on top of an explicit storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or a store cannot
    /// be read.
    pub fn with_storage(config: ClientConfig, storage: Arc<dyn StateStorage>) -> Result<Self> {
        let api = ApiClient::new(&config)?;
        let cart = PersistedStore::<Cart>::load(storage.clone())?;
        let profile = PersistedStore::<Profile>::load(storage.clone())?;
        let feed = FeedHandle::new(PersistedStore::<FeedState>::load(storage)?, config.page_size);
        let telemetry = Telemetry::new(api.clone());

        Ok(Self {
            inner: Arc::new(ClientStateInner {
                config,
                api,
                cart: Mutex::new(cart),
                profile: Mutex::new(profile),
                feed,
                telemetry,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    #[must_use]
    pub fn cart(&self) -> &Mutex<PersistedStore<Cart>> {
        &self.inner.cart
    }

    #[must_use]
    pub fn profile(&self) -> &Mutex<PersistedStore<Profile>> {
        &self.inner.profile
    }

    #[must_use]
    pub fn feed(&self) -> &FeedHandle {
        &self.inner.feed
    }

    #[must_use]
    pub fn telemetry(&self) -> &Telemetry {
        &self.inner.telemetry
    }

    /// Look up a product, preferring the local feed over the network.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not in the feed and the backend
    /// lookup fails.
    pub async fn find_product(&self, id: &ProductId) -> Result<Product> {
        let local = {
            let feed = self.feed().lock().await;
            feed.products().iter().find(|p| p.matches_id(id)).cloned()
        };
        match local {
            Some(product) => Ok(product),
            None => Ok(self.api().get_product(id).await?),
        }
    }

    /// Add one unit of a product to the cart. Returns the new quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the product cannot be found or the cart cannot be saved.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn add_to_cart(&self, id: &ProductId) -> Result<u32> {
        let product = self.find_product(id).await?;
        let mut cart = self.cart().lock().await;
        let quantity = cart.update(|cart| {
            cart.add(product);
            cart.quantity_of(id)
        })?;
        add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id.as_str())]));
        Ok(quantity)
    }

    /// Save a product to the profile. Returns whether it was newly saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the product cannot be found or the profile cannot be saved.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn save_product(&self, id: &ProductId) -> Result<bool> {
        let product = self.find_product(id).await?;
        let mut profile = self.profile().lock().await;
        Ok(profile.update(|profile| profile.add_saved_item(product))?)
    }

    /// Submit the cart as an order and clear it once the backend accepts it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty cart, or the API error if the
    /// order is rejected. The cart is kept on failure.
    #[instrument(skip(self, shipping_address, payment_method))]
    pub async fn checkout(
        &self,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
    ) -> Result<OrderReceipt> {
        let mut cart = self.cart().lock().await;
        if cart.is_empty() {
            return Err(ClientError::InvalidInput("Your cart is empty".to_string()));
        }

        let request = OrderRequest {
            shipping_address,
            payment_method,
            items: cart.order_lines(),
        };
        let receipt = self.api().create_order(&request).await?;
        cart.update(Cart::clear)?;

        info!(order_id = %receipt.order_id, total = %receipt.total, "Order placed");
        add_breadcrumb(
            "checkout",
            "Order placed",
            Some(&[("order_id", receipt.order_id.as_str())]),
        );
        Ok(receipt)
    }
}

impl std::fmt::Debug for ClientState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientState")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use mockito::{Matcher, Server};
    use url::Url;

    use super::*;
    use crate::storage::MemoryStorage;

    fn state_for(server: &Server) -> ClientState {
        let base = Url::parse(&format!("{}/api", server.url())).unwrap();
        let config = ClientConfig::new(base, PathBuf::from("/unused"));
        ClientState::with_storage(config, Arc::new(MemoryStorage::new())).unwrap()
    }

    fn address() -> ShippingAddress {
        ShippingAddress {
            name: "Ada Lovelace".to_string(),
            line1: "1 Analytical Way".to_string(),
            line2: None,
            city: "London".to_string(),
            postal_code: "N1".to_string(),
            country: "GB".to_string(),
        }
    }

    #[tokio::test]
    async fn test_checkout_rejects_empty_cart() {
        let server = Server::new_async().await;
        let state = state_for(&server);
        let err = state
            .checkout(address(), PaymentMethod::CashOnDelivery)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_add_to_cart_then_checkout_clears_cart() {
        let mut server = Server::new_async().await;
        let _products = server
            .mock("GET", "/api/products")
            .match_query(Matcher::UrlEncoded("limit".into(), "100".into()))
            .with_body(r#"[{"id": 5, "name": "Linen Shirt", "price": 40}]"#)
            .create_async()
            .await;
        let order = server
            .mock("POST", "/api/orders")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "items": [{"product_id": "5", "quantity": 2}]
            })))
            .with_status(201)
            .with_body(r#"{"order_id": "ord-1", "status": "pending", "total": 80.0}"#)
            .create_async()
            .await;

        let state = state_for(&server);
        let id = ProductId::parse("5").unwrap();
        assert_eq!(state.add_to_cart(&id).await.unwrap(), 1);
        assert_eq!(state.add_to_cart(&id).await.unwrap(), 2);

        let receipt = state
            .checkout(address(), PaymentMethod::CashOnDelivery)
            .await
            .unwrap();
        assert_eq!(receipt.order_id.as_str(), "ord-1");
        assert!(state.cart().lock().await.is_empty());
        order.assert_async().await;
    }

    #[tokio::test]
    async fn test_failed_checkout_keeps_cart() {
        let mut server = Server::new_async().await;
        let _products = server
            .mock("GET", "/api/products")
            .match_query(Matcher::Any)
            .with_body(r#"[{"id": 5, "price": 40}]"#)
            .create_async()
            .await;
        let _order = server
            .mock("POST", "/api/orders")
            .with_status(404)
            .with_body(r#"{"error": "Not found"}"#)
            .create_async()
            .await;

        let state = state_for(&server);
        let id = ProductId::parse("5").unwrap();
        state.add_to_cart(&id).await.unwrap();

        let err = state
            .checkout(address(), PaymentMethod::CashOnDelivery)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Api(_)));
        assert_eq!(state.cart().lock().await.quantity_of(&id), 1);
    }

    #[tokio::test]
    async fn test_save_product_is_idempotent() {
        let mut server = Server::new_async().await;
        let _products = server
            .mock("GET", "/api/products")
            .match_query(Matcher::Any)
            .with_body(r#"[{"id": 9, "name": "Cap"}]"#)
            .create_async()
            .await;

        let state = state_for(&server);
        let id = ProductId::parse("9").unwrap();
        assert!(state.save_product(&id).await.unwrap());
        assert!(!state.save_product(&id).await.unwrap());
        assert_eq!(state.profile().lock().await.saved_items().len(), 1);
    }
}
