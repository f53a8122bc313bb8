use serde::Deserialize;

/// Default identifying user-agent: a plain desktop browser string, since
/// storefront CDNs routinely reject obviously robotic agents
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Main configuration structure for Shopscope
///
/// Every knob has a documented default, so a config file is optional;
/// an empty TOML document produces the same configuration as
/// `Config::default()`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
}

/// HTTP request behavior
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Request timeout in seconds (default: 20)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra attempts after a transport-level failure (default: 2)
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Identifying user-agent string sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Product feed pagination bounds
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Items requested per feed page (default: 250)
    #[serde(rename = "page-limit", default = "default_page_limit")]
    pub page_limit: u32,

    /// Safety ceiling on feed pages per extraction (default: 10)
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,
}

/// Extraction behavior
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractConfig {
    /// Maximum concurrent extractions in batch mode (default: 5)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Cap on homepage hero products (default: 20)
    #[serde(rename = "hero-cap", default = "default_hero_cap")]
    pub hero_cap: usize,
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_retries() -> u32 {
    2
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_page_limit() -> u32 {
    250
}

fn default_max_pages() -> u32 {
    10
}

fn default_concurrency() -> usize {
    5
}

fn default_hero_cap() -> usize {
    20
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_limit: default_page_limit(),
            max_pages: default_max_pages(),
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            hero_cap: default_hero_cap(),
        }
    }
}
