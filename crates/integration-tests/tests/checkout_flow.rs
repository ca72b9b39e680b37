//! Integration tests for the cart and checkout flow.

use mockito::Matcher;
use rust_decimal::Decimal;
use swipey_client::ClientError;
use swipey_client::stores::Cart;
use swipey_core::{PaymentMethod, ProductId, ShippingAddress};
use swipey_integration_tests::{TestContext, product_json};

fn address() -> ShippingAddress {
    ShippingAddress {
        name: "Ada Lovelace".to_string(),
        line1: "1 Analytical Way".to_string(),
        line2: Some("Flat 2".to_string()),
        city: "London".to_string(),
        postal_code: "N1 9GU".to_string(),
        country: "GB".to_string(),
    }
}

async fn mock_catalogue(ctx: &mut TestContext) {
    let body = serde_json::json!([product_json(1, 19.99), product_json(2, 5.0)]).to_string();
    ctx.server
        .mock("GET", "/api/products")
        .match_query(Matcher::Any)
        .with_body(body)
        .create_async()
        .await;
}

#[tokio::test]
async fn test_cart_accumulates_and_persists() {
    let mut ctx = TestContext::new().await;
    mock_catalogue(&mut ctx).await;
    let one = ProductId::parse("1").unwrap();
    let two = ProductId::parse("2").unwrap();

    {
        let state = ctx.state(20);
        state.add_to_cart(&one).await.unwrap();
        state.add_to_cart(&one).await.unwrap();
        state.add_to_cart(&two).await.unwrap();
    }

    let state = ctx.state(20);
    let cart = state.cart().lock().await;
    assert_eq!(cart.lines().len(), 2);
    assert_eq!(cart.quantity_of(&one), 2);
    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.total(), Decimal::new(4498, 2));
}

#[tokio::test]
async fn test_set_quantity_zero_removes_line_on_disk() {
    let mut ctx = TestContext::new().await;
    mock_catalogue(&mut ctx).await;
    let one = ProductId::parse("1").unwrap();

    {
        let state = ctx.state(20);
        state.add_to_cart(&one).await.unwrap();
        state
            .cart()
            .lock()
            .await
            .update(|cart| cart.set_quantity(&one, 0))
            .unwrap();
    }

    assert!(ctx.state(20).cart().lock().await.is_empty());
}

#[tokio::test]
async fn test_checkout_submits_lines_and_clears_cart() {
    let mut ctx = TestContext::new().await;
    mock_catalogue(&mut ctx).await;
    let order = ctx
        .server
        .mock("POST", "/api/orders")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(serde_json::json!({
            "shipping_address": {
                "name": "Ada Lovelace",
                "line1": "1 Analytical Way",
                "line2": "Flat 2",
                "city": "London",
                "postal_code": "N1 9GU",
                "country": "GB"
            },
            "payment_method": {"type": "card", "token": "tok_visa"},
            "items": [{"product_id": "1", "quantity": 2}]
        })))
        .with_status(201)
        .with_body(r#"{"order_id": "ord-77", "status": "confirmed", "total": 39.98}"#)
        .create_async()
        .await;

    let one = ProductId::parse("1").unwrap();
    let state = ctx.state(20);
    state.add_to_cart(&one).await.unwrap();
    state.add_to_cart(&one).await.unwrap();

    let receipt = state
        .checkout(
            address(),
            PaymentMethod::Card {
                token: "tok_visa".to_string(),
            },
        )
        .await
        .unwrap();
    order.assert_async().await;
    assert_eq!(receipt.order_id.as_str(), "ord-77");
    assert_eq!(receipt.total, Decimal::new(3998, 2));

    assert!(ctx.state(20).cart().lock().await.is_empty());
}

#[tokio::test]
async fn test_checkout_with_empty_cart_is_rejected_locally() {
    let ctx = TestContext::new().await;
    let err = ctx
        .state(20)
        .checkout(address(), PaymentMethod::CashOnDelivery)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidInput(_)));
}

#[tokio::test]
async fn test_unknown_product_is_not_added() {
    let mut ctx = TestContext::new().await;
    mock_catalogue(&mut ctx).await;

    let state = ctx.state(20);
    let err = state
        .add_to_cart(&ProductId::parse("404").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Api(_)));
    assert_eq!(*state.cart().lock().await.state(), Cart::default());
}
