//! Shopping cart store.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use swipey_core::{OrderLine, Product, ProductId};

use super::CART_STORAGE_KEY;
use crate::storage::Persist;

/// A product in the cart with its quantity (always at least 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// Price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.product.price.times(self.quantity)
    }
}

/// Cart lines, unique by product id, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    items: Vec<CartLine>,
}

impl Persist for Cart {
    const STORAGE_KEY: &'static str = CART_STORAGE_KEY;
}

impl Cart {
    /// Add one unit of `product`, merging with an existing line.
    pub fn add(&mut self, product: Product) {
        if let Some(line) = self.line_mut(&product.id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.items.push(CartLine {
                product,
                quantity: 1,
            });
        }
    }

    /// Remove the line for `id`. Returns whether a line was removed.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|line| &line.product.id != id);
        self.items.len() != before
    }

    /// Set the quantity of an existing line; zero or less removes it.
    ///
    /// Ids not in the cart are ignored.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove(id);
            return;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self.line_mut(id) {
            line.quantity = quantity;
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartLine::subtotal).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.items.iter().any(|line| &line.product.id == id)
    }

    /// Quantity of `id` in the cart, 0 if absent.
    #[must_use]
    pub fn quantity_of(&self, id: &ProductId) -> u32 {
        self.items
            .iter()
            .find(|line| &line.product.id == id)
            .map_or(0, |line| line.quantity)
    }

    /// Order lines for checkout.
    #[must_use]
    pub fn order_lines(&self) -> Vec<OrderLine> {
        self.items
            .iter()
            .map(|line| OrderLine {
                product_id: line.product.id.clone(),
                quantity: line.quantity,
            })
            .collect()
    }

    fn line_mut(&mut self, id: &ProductId) -> Option<&mut CartLine> {
        self.items.iter_mut().find(|line| &line.product.id == id)
    }
}
