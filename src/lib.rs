//! Shopscope: a storefront brand-profile extractor
//!
//! This crate ingests the public-facing pages of a storefront website and
//! produces a normalized [`BrandRecord`]: identity, product catalog,
//! policies, FAQs, contact points, social handles, and key navigation
//! links. Extraction is deterministic and rule-based: fetch, structural
//! HTML analysis, heuristic classification, content normalization, and
//! strict-format enforcement on the assembled record.

pub mod config;
pub mod extract;
pub mod fetch;
pub mod model;

use thiserror::Error;

/// Main error type for Shopscope operations
///
/// The pipeline itself hard-fails only when the site root is
/// unreachable. Sub-page and feed problems degrade the affected field:
/// they surface internally as `PartialContent` / `MalformedFeed`, get
/// logged, and are absorbed. The remaining variants come from the entry
/// points: configuration loading, client construction, root URL
/// validation, and task joining.
#[derive(Debug, Error)]
pub enum ShopscopeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Site unreachable at {url}: {reason}")]
    UnreachableSite { url: String, reason: String },

    #[error("Sub-resource fetch failed for {url}: {reason}")]
    PartialContent { url: String, reason: String },

    #[error("Malformed product feed on page {page}: {reason}")]
    MalformedFeed { page: u32, reason: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Extraction task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for Shopscope operations
pub type Result<T> = std::result::Result<T, ShopscopeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::{extract_brand, extract_many, BrandExtractor};
pub use fetch::{absolutize, normalize_url, FetchClient};
pub use model::BrandRecord;
