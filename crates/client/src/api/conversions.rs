//! Normalization of raw product payloads.

use rust_decimal::Decimal;
use swipey_core::{Price, Product, ProductId};

use super::types::RawProduct;

const UNTITLED: &str = "Untitled product";
const NO_DESCRIPTION: &str = "No description available.";
const DEFAULT_CATEGORY: &str = "Product";

/// Convert a raw payload into a [`Product`].
///
/// `index` is the product's position in its listing, used to synthesize an
/// id when the payload carries neither `id` nor `external_id`.
#[must_use]
pub fn convert_product(raw: RawProduct, index: usize) -> Product {
    let images = collect_images(&raw);
    let external_id = raw.external_id;
    let id = raw
        .id
        .or_else(|| external_id.clone())
        .unwrap_or_else(|| fallback_id(index));

    let style_tags = if raw.style_tags.is_empty() {
        raw.tags
    } else {
        raw.style_tags
    };

    Product {
        id,
        external_id,
        name: non_blank(raw.name)
            .or_else(|| non_blank(raw.title))
            .unwrap_or_else(|| UNTITLED.to_string()),
        price: Price::new(
            raw.price.unwrap_or(Decimal::ZERO),
            raw.currency.unwrap_or_default(),
        ),
        category: non_blank(raw.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        tag: non_blank(raw.tag),
        brand: non_blank(raw.brand),
        description: non_blank(raw.description).unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        images,
        style_tags,
    }
}

/// Convert a whole listing, keeping listing order.
#[must_use]
pub fn convert_products(raw: Vec<RawProduct>) -> Vec<Product> {
    raw.into_iter()
        .enumerate()
        .map(|(index, product)| convert_product(product, index))
        .collect()
}

fn fallback_id(index: usize) -> ProductId {
    ProductId::parse(&format!("product-{index}")).unwrap_or_else(|_| ProductId::from(0))
}

/// Images in priority order: `image_url`, `image`, `media[].url`, `images[]`.
fn collect_images(raw: &RawProduct) -> Vec<String> {
    let media = raw
        .media
        .iter()
        .filter(|m| m.kind.as_deref().is_none_or(|kind| kind == "image"))
        .filter_map(|m| m.url.as_deref());

    let candidates = raw
        .image_url
        .as_deref()
        .into_iter()
        .chain(raw.image.as_deref())
        .chain(media)
        .chain(raw.images.iter().map(String::as_str));

    let mut images: Vec<String> = Vec::new();
    for url in candidates {
        let url = url.trim();
        if !url.is_empty() && !images.iter().any(|seen| seen == url) {
            images.push(url.to_string());
        }
    }
    images
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
