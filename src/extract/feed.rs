//! Product feed deserialization and mapping
//!
//! The storefront's `/products.json` feed is untrusted, partially
//! malformed input: fields go missing, tags arrive as either a comma
//! string or an array, and prices arrive as strings or numbers. The raw
//! types here accept all of that; [`map_products`] turns the survivors
//! into normalized [`Product`] records.

use crate::model::Product;
use serde::Deserialize;

/// One page of the paginated feed: `{"products": [...]}`
#[derive(Debug, Default, Deserialize)]
pub struct FeedPage {
    #[serde(default)]
    pub products: Vec<RawProduct>,
}

/// A product object as the feed sends it
#[derive(Debug, Default, Deserialize)]
pub struct RawProduct {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub handle: Option<String>,
    pub product_type: Option<String>,
    pub vendor: Option<String>,
    #[serde(default)]
    pub tags: RawTags,
    #[serde(default)]
    pub images: Vec<RawImage>,
    #[serde(default)]
    pub variants: Vec<RawVariant>,
}

/// Tags arrive either as one comma-separated string or as an array
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTags {
    Csv(String),
    List(Vec<String>),
    /// Anything else (null, numbers) counts as no tags
    Other(serde_json::Value),
}

impl Default for RawTags {
    fn default() -> Self {
        RawTags::List(Vec::new())
    }
}

impl RawTags {
    /// Normalizes to a trimmed list with empties dropped
    fn into_list(self) -> Vec<String> {
        let raw = match self {
            RawTags::Csv(s) => s.split(',').map(str::to_string).collect(),
            RawTags::List(items) => items,
            RawTags::Other(_) => Vec::new(),
        };
        raw.iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawImage {
    pub src: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawVariant {
    /// String in practice, but numbers are tolerated
    pub price: Option<serde_json::Value>,
}

/// Parses one feed page body; any JSON error is the caller's stop signal
pub fn parse_feed_page(body: &str) -> Result<FeedPage, serde_json::Error> {
    serde_json::from_str(body)
}

/// Computes the price-range string for a set of variants
///
/// Distinct parseable prices, sorted ascending, formatted to two decimal
/// places: a single value formats as `"x.xx"`, a spread as
/// `"lo.xx-hi.xx"`. No parseable price at all yields `None`.
fn price_range(variants: &[RawVariant]) -> Option<String> {
    let mut prices: Vec<f64> = variants
        .iter()
        .filter_map(|v| v.price.as_ref())
        .filter_map(|p| match p {
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            serde_json::Value::Number(n) => n.as_f64(),
            _ => None,
        })
        .filter(|p| p.is_finite())
        .collect();

    prices.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    prices.dedup();

    let (low, high) = (prices.first()?, prices.last()?);
    if prices.len() == 1 {
        Some(format!("{:.2}", low))
    } else {
        Some(format!("{:.2}-{:.2}", low, high))
    }
}

/// Maps one raw feed product into a normalized record
pub fn map_product(raw: RawProduct) -> Product {
    let images = raw
        .images
        .into_iter()
        .filter_map(|img| img.src)
        .filter(|src| !src.is_empty())
        .collect();

    let price_range = price_range(&raw.variants);

    let handle = raw.handle.filter(|h| !h.is_empty());
    let url = handle.as_ref().map(|h| format!("/products/{}", h));

    Product {
        id: raw.id,
        title: raw.title,
        handle,
        product_type: raw.product_type,
        vendor: raw.vendor,
        tags: raw.tags.into_list(),
        url,
        images,
        price_range,
    }
}

/// Maps a whole feed page worth of raw products
pub fn map_products(raw: Vec<RawProduct>) -> Vec<Product> {
    raw.into_iter().map(map_product).collect()
}
