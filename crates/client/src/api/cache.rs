//! Cache types for REST API responses.

use swipey_core::Product;

/// Cache key for product listings.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products { limit: usize, offset: usize },
    DashboardProducts,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Vec<Product>),
}
