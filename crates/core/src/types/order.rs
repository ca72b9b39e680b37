//! Order records exchanged with the checkout endpoints.
//!
//! The order endpoints are a published contract that the backend does not
//! fully serve yet; these types follow the contract.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{OrderId, ProductId};

/// Where an order ships to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub name: String,
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// How an order is paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentMethod {
    /// A card tokenized by the payment provider.
    Card { token: String },
    /// Paid on delivery.
    CashOnDelivery,
}

/// One product line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Body for `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub items: Vec<OrderLine>,
}

/// Response to `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub status: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// A placed order as returned by `GET /orders/:id` and the order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    #[serde(default)]
    pub items: Vec<OrderLine>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_tagging() {
        let json = serde_json::to_value(PaymentMethod::CashOnDelivery).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "cash_on_delivery" }));
    }

    #[test]
    fn test_order_history_entry_without_items() {
        let order: Order = serde_json::from_str(
            r#"{"order_id": 9, "total": 120.5, "status": "paid", "created_at": "2025-03-01T12:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(order.order_id.as_str(), "9");
        assert!(order.items.is_empty());
        assert_eq!(order.total, Decimal::new(1205, 1));
    }
}
