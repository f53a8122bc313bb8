//! Record types for the assembled brand profile
//!
//! These are the types the extraction pipeline produces: a single
//! [`BrandRecord`] aggregate plus its component pieces. Everything is
//! serde-serializable so the record can be handed to a routing layer or
//! printed as JSON, and deserializable so stored snapshots round-trip.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single product, either from the full feed or a homepage hero slot.
///
/// All fields are optional because the feed is untrusted input: a
/// partially-filled product is still worth keeping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Option<i64>,
    pub title: Option<String>,
    /// URL-safe slug; when present, `url` defaults to `/products/{handle}`
    pub handle: Option<String>,
    pub product_type: Option<String>,
    pub vendor: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    /// Either `"x.xx"` or `"lo.xx-hi.xx"`, always two decimal places
    pub price_range: Option<String>,
}

/// A question/answer pair from structured data or the heading heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

/// A policy page (privacy, return/refund).
///
/// `content_text` is hard-truncated to 2000 characters, never summarized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub title: String,
    pub url: Option<String>,
    pub content_text: Option<String>,
}

/// One optional handle URL per known social platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialHandles {
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub tiktok: Option<String>,
    pub twitter: Option<String>,
    pub youtube: Option<String>,
    pub pinterest: Option<String>,
    pub linkedin: Option<String>,
}

/// Contact points found anywhere in the scanned pages.
///
/// Phones conform to the strict `+<1-3 digit CC>-<7-15 digit number>`
/// form; anything that cannot be canonicalized into that shape is
/// dropped during assembly, never coerced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub phones: Vec<String>,
}

/// The seven navigation slots the pipeline classifies links into.
///
/// Every populated slot is an absolute URL (absolutized against the
/// site root during assembly).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportantLinks {
    pub order_tracking: Option<String>,
    pub contact_us: Option<String>,
    pub blog: Option<String>,
    pub returns: Option<String>,
    pub privacy: Option<String>,
    pub faq: Option<String>,
    pub about: Option<String>,
}

/// The root aggregate produced by one extraction invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrandRecord {
    /// Canonical site root: scheme + host, no trailing slash
    pub website_url: String,
    pub brand_name: Option<String>,
    /// Products featured on the homepage, discovery order, capped
    #[serde(default)]
    pub hero_products: Vec<Product>,
    /// Everything the paginated feed returned
    #[serde(default)]
    pub product_catalog: Vec<Product>,
    pub privacy_policy: Option<Policy>,
    pub return_refund_policy: Option<Policy>,
    #[serde(default)]
    pub faqs: Vec<FaqItem>,
    #[serde(default)]
    pub social_handles: SocialHandles,
    #[serde(default)]
    pub contact_info: ContactInfo,
    pub about_text: Option<String>,
    #[serde(default)]
    pub important_links: ImportantLinks,
    /// Free-form extras (e.g. the discovered-links list)
    #[serde(default)]
    pub raw_meta: HashMap<String, serde_json::Value>,
}
