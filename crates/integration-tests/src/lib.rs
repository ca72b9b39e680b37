//! Integration tests for Swipey.
//!
//! Each test runs the client library against a `mockito` backend and a
//! temporary data directory, so stores are written to real files and a
//! "restart" is just a second [`TestContext::state`] over the same directory.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p swipey-integration-tests
//! ```

use std::sync::Arc;

use mockito::{Server, ServerGuard};
use swipey_client::storage::{FileStorage, StateStorage};
use swipey_client::{ClientConfig, ClientState};
use tempfile::TempDir;
use url::Url;

/// A mocked backend plus an isolated data directory.
pub struct TestContext {
    pub server: ServerGuard,
    pub data_dir: TempDir,
}

impl TestContext {
    /// Start a mock server and create an empty data directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let data_dir = tempfile::tempdir().expect("failed to create temp dir");
        Self { server, data_dir }
    }

    /// Client configuration pointing at the mock server's `/api`.
    ///
    /// # Panics
    ///
    /// Panics if the mock server URL is not a valid URL.
    #[must_use]
    pub fn config(&self, page_size: usize) -> ClientConfig {
        let base = Url::parse(&format!("{}/api", self.server.url())).expect("mock server url");
        let mut config = ClientConfig::new(base, self.data_dir.path().to_path_buf());
        config.page_size = page_size;
        config
    }

    /// Build client state over the data directory, loading whatever an
    /// earlier state saved there.
    ///
    /// # Panics
    ///
    /// Panics if the state cannot be created.
    #[must_use]
    pub fn state(&self, page_size: usize) -> ClientState {
        ClientState::new(self.config(page_size)).expect("failed to build client state")
    }

    /// Raw access to the stored documents.
    #[must_use]
    pub fn storage(&self) -> Arc<dyn StateStorage> {
        Arc::new(FileStorage::new(self.data_dir.path()))
    }

    /// Accept any view, click or swipe telemetry.
    pub async fn accept_telemetry(&mut self) {
        for path in ["/api/views", "/api/clicks", "/api/register-swipe"] {
            self.server
                .mock("POST", path)
                .with_body(r#"{"status": "success"}"#)
                .expect_at_least(0)
                .create_async()
                .await;
        }
    }
}

/// A backend product payload with the given id and price.
#[must_use]
pub fn product_json(id: u32, price: f64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": format!("Product {id}"),
        "price": price,
        "category": "Tops",
        "image_url": format!("https://cdn.example/{id}.jpg"),
        "description": "Soft cotton"
    })
}

/// A feed page body holding products `ids`.
#[must_use]
pub fn feed_body(ids: &[u32], next_cursor: Option<&str>) -> String {
    let products: Vec<_> = ids.iter().map(|&id| product_json(id, 20.0)).collect();
    serde_json::json!({ "products": products, "next_cursor": next_cursor }).to_string()
}
