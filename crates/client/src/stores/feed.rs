//! Discovery feed store.
//!
//! [`FeedState`] is the accumulated product list with a read index.
//! [`FeedHandle`] shares it between the swipe loop and page loading, and
//! makes sure at most one page fetch is outstanding at a time.

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use swipey_core::Product;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, instrument};

use super::FEED_STORAGE_KEY;
use crate::api::FeedPage;
use crate::storage::{Persist, PersistedStore, StorageError};

/// The feed: products in arrival order and the index of the current card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedState {
    products: Vec<Product>,
    index: usize,
    has_more: bool,
    #[serde(skip)]
    loading: bool,
    cursor: Option<String>,
    likes: Vec<Product>,
    passes: Vec<Product>,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            index: 0,
            has_more: true,
            loading: false,
            cursor: None,
            likes: Vec::new(),
            passes: Vec::new(),
        }
    }
}

impl Persist for FeedState {
    const STORAGE_KEY: &'static str = FEED_STORAGE_KEY;
}

impl FeedState {
    /// Replace the list with a fresh first page.
    ///
    /// Resets the read index, cursor and exhaustion flag. Histories are kept.
    pub fn replace(&mut self, products: Vec<Product>) {
        self.products.clear();
        self.index = 0;
        self.has_more = true;
        self.cursor = None;
        self.append(products);
    }

    /// Append a page, dropping products whose id is already present.
    ///
    /// Returns how many products were added.
    pub fn append(&mut self, products: Vec<Product>) -> usize {
        let before = self.products.len();
        for product in products {
            if !self.products.iter().any(|p| p.id == product.id) {
                self.products.push(product);
            }
        }
        self.products.len() - before
    }

    /// Apply a fetched page: append it, mark exhaustion when it is shorter
    /// than `limit`, and store the next cursor.
    ///
    /// Without a server cursor the offset of loaded entries is used instead.
    pub fn apply_page(&mut self, page: FeedPage, limit: usize) -> usize {
        let fetched = page.products.len();
        let added = self.append(page.products);
        if fetched < limit {
            self.has_more = false;
        }
        self.cursor = page
            .next_cursor
            .or_else(|| Some(self.products.len().to_string()));
        added
    }

    /// Move to the next card. Advancing past the end leaves the feed empty.
    pub fn advance(&mut self) {
        if self.index < self.products.len() {
            self.index += 1;
        }
    }

    /// The card under the user's finger, or `None` once the list is used up.
    #[must_use]
    pub fn current(&self) -> Option<&Product> {
        self.products.get(self.index)
    }

    /// Up to `n` cards behind the current one.
    #[must_use]
    pub fn peek(&self, n: usize) -> &[Product] {
        let start = (self.index + 1).min(self.products.len());
        let end = start.saturating_add(n).min(self.products.len());
        self.products.get(start..end).unwrap_or_default()
    }

    /// Cards left, including the current one.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.products.len().saturating_sub(self.index)
    }

    /// Whether a prefetch should start: `threshold` or fewer cards remain
    /// and more pages may exist.
    #[must_use]
    pub fn needs_preload(&self, threshold: usize) -> bool {
        self.has_more && self.remaining() <= threshold
    }

    /// No more pages will be fetched.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        !self.has_more
    }

    /// A page fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn record_like(&mut self, product: Product) {
        self.likes.push(product);
    }

    pub fn record_pass(&mut self, product: Product) {
        self.passes.push(product);
    }

    #[must_use]
    pub fn likes(&self) -> &[Product] {
        &self.likes
    }

    #[must_use]
    pub fn passes(&self) -> &[Product] {
        &self.passes
    }

    /// Clear everything, histories included.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// =============================================================================
// Shared Handle
// =============================================================================

/// Parameters of one page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub cursor: Option<String>,
    pub limit: usize,
}

/// Result of [`FeedHandle::load_more`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page arrived; the count is the number of new products.
    Loaded(usize),
    /// Another fetch was already in flight; nothing was requested.
    AlreadyLoading,
    /// The feed has no more pages.
    Exhausted,
}

#[derive(Clone, Copy)]
enum Placement {
    Append,
    Replace,
}

/// Shared, persisted feed.
#[derive(Clone)]
pub struct FeedHandle {
    store: Arc<Mutex<PersistedStore<FeedState>>>,
    page_size: usize,
}

impl FeedHandle {
    #[must_use]
    pub fn new(store: PersistedStore<FeedState>, page_size: usize) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            page_size: page_size.max(1),
        }
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Lock the feed for reading or a synchronous update.
    pub async fn lock(&self) -> MutexGuard<'_, PersistedStore<FeedState>> {
        self.store.lock().await
    }

    /// Fetch the next page and append it.
    ///
    /// The in-flight flag is checked and set under the lock, which is then
    /// released for the duration of `fetch`. A second call made while a
    /// fetch is outstanding returns [`LoadOutcome::AlreadyLoading`] without
    /// calling its own `fetch`.
    ///
    /// # Errors
    ///
    /// Returns the fetch error (the flag is cleared and the list is left
    /// untouched) or a storage error if the new state cannot be saved.
    #[instrument(skip(self, fetch), fields(page_size = self.page_size))]
    pub async fn load_more<F, Fut, E>(&self, fetch: F) -> Result<LoadOutcome, E>
    where
        F: FnOnce(PageRequest) -> Fut,
        Fut: Future<Output = Result<FeedPage, E>>,
        E: From<StorageError>,
    {
        self.fetch_page(fetch, Placement::Append).await
    }

    /// Fetch the first page and replace the list with it.
    ///
    /// # Errors
    ///
    /// Same as [`FeedHandle::load_more`].
    #[instrument(skip(self, fetch), fields(page_size = self.page_size))]
    pub async fn reload<F, Fut, E>(&self, fetch: F) -> Result<LoadOutcome, E>
    where
        F: FnOnce(PageRequest) -> Fut,
        Fut: Future<Output = Result<FeedPage, E>>,
        E: From<StorageError>,
    {
        self.fetch_page(fetch, Placement::Replace).await
    }

    async fn fetch_page<F, Fut, E>(&self, fetch: F, placement: Placement) -> Result<LoadOutcome, E>
    where
        F: FnOnce(PageRequest) -> Fut,
        Fut: Future<Output = Result<FeedPage, E>>,
        E: From<StorageError>,
    {
        let request = {
            let mut feed = self.store.lock().await;
            if feed.is_loading() {
                debug!("Page fetch already in flight");
                return Ok(LoadOutcome::AlreadyLoading);
            }
            if matches!(placement, Placement::Append) && feed.is_exhausted() {
                return Ok(LoadOutcome::Exhausted);
            }
            feed.state_mut().loading = true;
            PageRequest {
                cursor: match placement {
                    Placement::Append => feed.cursor.clone(),
                    Placement::Replace => None,
                },
                limit: self.page_size,
            }
        };

        let result = fetch(request).await;

        let mut feed = self.store.lock().await;
        feed.state_mut().loading = false;
        let page = result?;

        let limit = self.page_size;
        let added = feed.update(|state| {
            if matches!(placement, Placement::Replace) {
                state.replace(Vec::new());
            }
            state.apply_page(page, limit)
        })?;
        debug!(added, exhausted = feed.is_exhausted(), "Applied feed page");
        Ok(LoadOutcome::Loaded(added))
    }
}

impl std::fmt::Debug for FeedHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedHandle")
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}
