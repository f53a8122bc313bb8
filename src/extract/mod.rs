//! Extraction layer: signal extractors, text normalization, feed
//! mapping, and the orchestrating pipeline
//!
//! The extractors and normalizers are pure functions; the pipeline in
//! [`pipeline`] is the only stateful coordinator, sequencing fetches
//! and applying the fallback chains.

mod feed;
mod pipeline;
mod signals;
mod text;

pub use feed::{map_product, map_products, parse_feed_page, FeedPage, RawProduct};
pub use pipeline::{extract_brand, extract_many, BrandExtractor};
pub use signals::{
    canonicalize_phone, extract_brand_name, extract_emails, extract_heading_faqs,
    extract_hero_products, extract_jsonld_faqs, extract_phone_candidates, extract_socials,
    find_links, main_region_text,
};
pub use text::{clean_text, truncate_chars, unique_keep_order};
