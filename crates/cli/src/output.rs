//! Terminal output for command results.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use swipey_client::api::DashboardSummary;
use swipey_client::stores::{Cart, Profile};
use swipey_core::types::price::format_amount;
use swipey_core::{CurrencyCode, Order, OrderReceipt, Product};

pub fn failure(message: &str) {
    eprintln!("error: {message}");
}

pub fn line(message: &str) {
    println!("{message}");
}

/// One-line product summary: `[id] name - $price (category)`.
pub fn product_summary(product: &Product) -> String {
    let tag = product
        .tag
        .as_deref()
        .map(|tag| format!(" [{tag}]"))
        .unwrap_or_default();
    format!(
        "[{}] {} - {} ({}){tag}",
        product.id,
        product.name,
        product.price.display(),
        product.category
    )
}

pub fn product_detail(product: &Product) {
    println!("{}", product_summary(product));
    if let Some(brand) = &product.brand {
        println!("  brand: {brand}");
    }
    println!("  {}", product.description);
    if let Some(image) = product.primary_image() {
        println!("  image: {image}");
    }
    if !product.style_tags.is_empty() {
        println!("  styles: {}", product.style_tags.join(", "));
    }
}

pub fn product_list(products: &[Product]) {
    if products.is_empty() {
        println!("(none)");
    }
    for product in products {
        println!("{}", product_summary(product));
    }
}

pub fn cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Your cart is empty");
        return;
    }
    for line in cart.lines() {
        println!(
            "{} x{} = {}",
            product_summary(&line.product),
            line.quantity,
            format_amount(line.subtotal(), line.product.price.currency_code)
        );
    }
    let currency = cart
        .lines()
        .first()
        .map_or_else(CurrencyCode::default, |line| line.product.price.currency_code);
    println!(
        "{} item(s), total {}",
        cart.item_count(),
        format_amount(cart.total(), currency)
    );
}

pub fn profile(profile: &Profile) {
    if !profile.is_profile_complete() {
        println!("Profile not set up yet. Run `swipey profile setup`.");
    }
    println!("name:   {}", profile.name());
    println!(
        "age:    {}",
        profile.age().map(|age| age.to_string()).unwrap_or_default()
    );
    println!("gender: {}", profile.gender());
    println!("styles: {}", profile.preferred_styles().join(", "));
    println!("saved:  {} item(s)", profile.saved_items().len());
}

pub fn receipt(receipt: &OrderReceipt) {
    println!(
        "Order {} placed ({}), total {}",
        receipt.order_id,
        receipt.status,
        format_amount(receipt.total, CurrencyCode::default())
    );
}

pub fn order(order: &Order) {
    println!(
        "Order {} ({}) {} - {}",
        order.order_id,
        order.created_at.format("%Y-%m-%d"),
        order.status,
        format_amount(order.total, CurrencyCode::default())
    );
}

pub fn summary(summary: &DashboardSummary) {
    println!("daily users:     {}", summary.daily_users);
    println!(
        "revenue:         {}",
        format_amount(summary.revenue, CurrencyCode::default())
    );
    println!("conversion rate: {:.1}%", summary.conversion_rate);
}
