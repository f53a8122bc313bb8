//! Extraction orchestrator
//!
//! The pipeline that sequences fetches and extractors into a finished
//! [`BrandRecord`]. Stages run strictly in order, one fetch at a time;
//! every sub-page failure degrades its field to absent/empty rather than
//! aborting. The only hard-fail points are the root-reachability gate
//! (before the pipeline is constructed) and nothing else.
//!
//! `scraper` documents are never held across await points: each fetched
//! body is analyzed inside a synchronous helper that returns owned data,
//! which keeps the extraction future `Send`.

use crate::config::Config;
use crate::extract::feed::{map_products, parse_feed_page};
use crate::extract::signals::{
    canonicalize_phone, extract_brand_name, extract_emails, extract_heading_faqs,
    extract_hero_products, extract_jsonld_faqs, extract_phone_candidates, extract_socials,
    find_links, main_region_text,
};
use crate::extract::text::{clean_text, truncate_chars, unique_keep_order};
use crate::fetch::{absolutize, FetchClient};
use crate::model::{BrandRecord, ContactInfo, FaqItem, ImportantLinks, Policy, Product};
use crate::{Result, ShopscopeError};
use scraper::Html;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;

// Keyword tables for link classification, in category priority order.
const FAQ_HINTS: &[&str] = &["faq", "faqs", "help", "support"];
const ABOUT_HINTS: &[&str] = &["about", "our story", "about us", "about-us"];
const TRACK_HINTS: &[&str] = &["track", "order tracking", "track order", "track-order"];
const BLOG_HINTS: &[&str] = &["blog", "blogs", "journal"];
const CONTACT_HINTS: &[&str] = &["contact", "contact us", "support", "customer service"];
const PRIVACY_HINTS: &[&str] = &["privacy"];
const RETURNS_HINTS: &[&str] = &["return", "refund"];

/// Conventional policy paths probed when no link was discovered.
/// This is a guess by route name, not a fetch-and-check.
const COMMON_POLICY_ROUTES: &[&str] = &[
    "/policies/privacy-policy",
    "/policies/refund-policy",
    "/policies/shipping-policy",
];

const POLICY_TEXT_CAP: usize = 2000;
const ABOUT_TEXT_CAP: usize = 2000;
const FAQ_ANSWER_CAP: usize = 600;
const FAQ_PAIR_CAP: usize = 20;
const DISCOVERED_LINK_CAP: usize = 20;

/// Everything the homepage yields in one synchronous pass
struct HomepageScan {
    brand_name: Option<String>,
    links: HashMap<String, String>,
    hero_products: Vec<Product>,
    embedded_faqs: Vec<FaqItem>,
}

fn scan_homepage(html: &str, hero_cap: usize) -> HomepageScan {
    let doc = Html::parse_document(html);
    HomepageScan {
        brand_name: extract_brand_name(&doc),
        links: find_links(&doc, &all_keywords()),
        hero_products: extract_hero_products(&doc, hero_cap),
        embedded_faqs: extract_jsonld_faqs(&doc),
    }
}

fn all_keywords() -> Vec<&'static str> {
    let mut keywords: Vec<&str> = FAQ_HINTS
        .iter()
        .chain(ABOUT_HINTS)
        .chain(TRACK_HINTS)
        .chain(BLOG_HINTS)
        .chain(CONTACT_HINTS)
        .chain(PRIVACY_HINTS)
        .chain(RETURNS_HINTS)
        .copied()
        .collect();
    keywords.sort_unstable();
    keywords.dedup();
    keywords
}

/// First keyword in the category's fixed order that discovered a link
fn pick_link<'a>(links: &'a HashMap<String, String>, hints: &[&str]) -> Option<&'a str> {
    hints.iter().find_map(|hint| links.get(*hint).map(String::as_str))
}

/// Route-name guess from the conventional policy paths
fn guess_policy_route(fragment: &str) -> Option<&'static str> {
    COMMON_POLICY_ROUTES
        .iter()
        .find(|route| route.contains(fragment))
        .copied()
}

fn page_main_text(html: &str) -> String {
    main_region_text(&Html::parse_document(html))
}

fn page_jsonld_faqs(html: &str) -> Vec<FaqItem> {
    extract_jsonld_faqs(&Html::parse_document(html))
}

fn page_heading_faqs(html: &str) -> Vec<FaqItem> {
    extract_heading_faqs(&Html::parse_document(html), FAQ_ANSWER_CAP, FAQ_PAIR_CAP)
}

/// The stateful coordinator for one extraction invocation
///
/// Owns the fetch client and all intermediate values; everything is
/// discarded once the [`BrandRecord`] is returned. Construct it with a
/// root URL that [`FetchClient::ensure_root_reachable`] has already
/// confirmed (the [`extract_brand`] entry point does both steps).
pub struct BrandExtractor {
    client: FetchClient,
    config: Config,
    base_url: String,
}

impl BrandExtractor {
    pub fn new(client: FetchClient, base_url: String, config: Config) -> Self {
        Self {
            client,
            config,
            base_url,
        }
    }

    /// Runs the full extraction pipeline
    ///
    /// Stages run strictly in sequence; each sub-fetch failure degrades
    /// the corresponding field and the pipeline continues.
    pub async fn extract(&self) -> BrandRecord {
        tracing::info!("Extracting brand profile from {}", self.base_url);

        // Stage 1: homepage fetch; an unusable response degrades to an
        // empty document, never an abort
        let (status, body) = self.client.fetch_text(&self.base_url).await;
        if body.is_none() {
            tracing::warn!("Homepage fetch unusable (status {}), degrading", status);
        }
        let homepage_html = body.unwrap_or_default();

        // Stages 2, 3, 11: one synchronous pass over the parsed homepage
        let scan = scan_homepage(&homepage_html, self.config.extract.hero_cap);
        tracing::debug!(
            "Homepage scan: brand={:?}, links={}, heroes={}",
            scan.brand_name,
            scan.links.len(),
            scan.hero_products.len()
        );

        // Stage 3: link classification into the seven slots
        let important_links = ImportantLinks {
            order_tracking: pick_link(&scan.links, TRACK_HINTS).map(String::from),
            contact_us: pick_link(&scan.links, CONTACT_HINTS).map(String::from),
            blog: pick_link(&scan.links, BLOG_HINTS).map(String::from),
            returns: pick_link(&scan.links, RETURNS_HINTS).map(String::from),
            privacy: pick_link(&scan.links, PRIVACY_HINTS).map(String::from),
            faq: pick_link(&scan.links, FAQ_HINTS).map(String::from),
            about: pick_link(&scan.links, ABOUT_HINTS).map(String::from),
        };

        // Stage 4: policy URL resolution, conventional-route guess when
        // no link was discovered
        let privacy_url = important_links
            .privacy
            .clone()
            .or_else(|| guess_policy_route("privacy").map(String::from))
            .map(|href| absolutize(&self.base_url, &href));
        let returns_url = important_links
            .returns
            .clone()
            .or_else(|| guess_policy_route("refund").map(String::from))
            .map(|href| absolutize(&self.base_url, &href));

        // Stage 5: contact and social signals from the raw homepage HTML
        let emails = extract_emails(&homepage_html);
        let phone_candidates = extract_phone_candidates(&homepage_html);
        let social_handles = extract_socials(&homepage_html);

        // Stage 6: about text
        let about_text = match &important_links.about {
            Some(href) => self.fetch_about_text(&absolutize(&self.base_url, href)).await,
            None => None,
        };

        // Stage 7: FAQ fallback chain
        let faqs = self
            .resolve_faqs(&homepage_html, scan.embedded_faqs, important_links.faq.as_deref())
            .await;

        // Stage 8: policy content
        let privacy_policy = match privacy_url {
            Some(url) => self.fetch_policy(url, "Privacy Policy").await,
            None => None,
        };
        let return_refund_policy = match returns_url {
            Some(url) => self.fetch_policy(url, "Return & Refund Policy").await,
            None => None,
        };

        // Stages 9, 10: paginated product feed
        let product_catalog = self.fetch_catalog().await;

        // Stage 12: absolutize every populated link slot
        let important_links = self.absolutize_links(important_links);

        // Supplementary context the original also carried: every
        // discovered link plus the conventional policy routes, absolute,
        // deduplicated in discovery order, capped
        let discovered_links = self.discovered_links(&scan.links);
        let mut raw_meta = HashMap::new();
        if !discovered_links.is_empty() {
            raw_meta.insert(
                "discovered_links".to_string(),
                serde_json::Value::from(discovered_links),
            );
        }

        // Stage 13: assembly with the strict phone filter as final net
        let record = BrandRecord {
            website_url: self.base_url.clone(),
            brand_name: scan.brand_name,
            hero_products: scan.hero_products,
            product_catalog,
            privacy_policy,
            return_refund_policy,
            faqs,
            social_handles,
            contact_info: ContactInfo {
                emails: unique_keep_order(emails),
                phones: unique_keep_order(
                    phone_candidates
                        .iter()
                        .filter_map(|candidate| canonicalize_phone(candidate)),
                ),
            },
            about_text,
            important_links,
            raw_meta,
        };

        tracing::info!(
            "Extraction complete for {}: {} products, {} faqs",
            record.website_url,
            record.product_catalog.len(),
            record.faqs.len()
        );
        record
    }

    /// FAQ fallback chain, stopping at the first non-empty source:
    /// homepage JSON-LD, then the discovered FAQ page's JSON-LD, then
    /// the heading/sibling heuristic (on the FAQ page when one was
    /// fetched, else on the homepage)
    async fn resolve_faqs(
        &self,
        homepage_html: &str,
        embedded: Vec<FaqItem>,
        faq_href: Option<&str>,
    ) -> Vec<FaqItem> {
        if !embedded.is_empty() {
            tracing::debug!("FAQs from homepage structured data: {}", embedded.len());
            return embedded;
        }

        let mut faq_page_html = None;
        if let Some(href) = faq_href {
            let url = absolutize(&self.base_url, href);
            let (status, body) = self.client.fetch_text(&url).await;
            if status < 400 {
                faq_page_html = body;
            }
            if let Some(html) = &faq_page_html {
                let faqs = page_jsonld_faqs(html);
                if !faqs.is_empty() {
                    tracing::debug!("FAQs from {} structured data: {}", url, faqs.len());
                    return faqs;
                }
            }
        }

        let source = faq_page_html.as_deref().unwrap_or(homepage_html);
        let faqs = page_heading_faqs(source);
        tracing::debug!("FAQs from heading heuristic: {}", faqs.len());
        faqs
    }

    /// Fetches a policy page and extracts its main-region text
    ///
    /// Any fetch failure yields `None`: a missing policy is an absent
    /// field, not a pipeline failure.
    async fn fetch_policy(&self, url: String, title: &str) -> Option<Policy> {
        let (status, body) = self.client.fetch_text(&url).await;
        if status >= 400 {
            let err = ShopscopeError::PartialContent {
                url,
                reason: format!("status {}", status),
            };
            tracing::debug!("{}", err);
            return None;
        }
        let body = body?;
        let content = clean_text(Some(&page_main_text(&body)))
            .filter(|text| !text.is_empty())
            .map(|text| truncate_chars(&text, POLICY_TEXT_CAP));
        Some(Policy {
            title: title.to_string(),
            url: Some(url),
            content_text: content,
        })
    }

    async fn fetch_about_text(&self, url: &str) -> Option<String> {
        let (status, body) = self.client.fetch_text(url).await;
        if status >= 400 {
            tracing::debug!("About fetch failed for {} (status {})", url, status);
            return None;
        }
        let body = body?;
        clean_text(Some(&page_main_text(&body)))
            .filter(|text| !text.is_empty())
            .map(|text| truncate_chars(&text, ABOUT_TEXT_CAP))
    }

    /// Pages through the product feed with safety bounds
    ///
    /// Stops on an unusable response, an empty page, a short page (the
    /// feed's last), the page ceiling, or malformed JSON, keeping
    /// whatever was gathered so far.
    async fn fetch_catalog(&self) -> Vec<Product> {
        let page_limit = self.config.feed.page_limit;
        let mut catalog = Vec::new();

        for page in 1..=self.config.feed.max_pages {
            let url = format!(
                "{}/products.json?limit={}&page={}",
                self.base_url, page_limit, page
            );
            let (status, body) = self.client.fetch_text(&url).await;
            let Some(body) = body else {
                break;
            };
            if status >= 400 {
                break;
            }

            match parse_feed_page(&body) {
                Ok(feed) => {
                    if feed.products.is_empty() {
                        break;
                    }
                    let count = feed.products.len();
                    catalog.extend(map_products(feed.products));
                    tracing::debug!("Feed page {}: {} products", page, count);
                    if (count as u32) < page_limit {
                        break;
                    }
                }
                Err(e) => {
                    let err = ShopscopeError::MalformedFeed {
                        page,
                        reason: e.to_string(),
                    };
                    tracing::warn!("{}; keeping {} products", err, catalog.len());
                    break;
                }
            }
        }

        catalog
    }

    fn absolutize_links(&self, links: ImportantLinks) -> ImportantLinks {
        let abs = |href: Option<String>| href.map(|h| absolutize(&self.base_url, &h));
        ImportantLinks {
            order_tracking: abs(links.order_tracking),
            contact_us: abs(links.contact_us),
            blog: abs(links.blog),
            returns: abs(links.returns),
            privacy: abs(links.privacy),
            faq: abs(links.faq),
            about: abs(links.about),
        }
    }

    fn discovered_links(&self, links: &HashMap<String, String>) -> Vec<String> {
        let mut discovered: Vec<String> = links
            .values()
            .map(|href| absolutize(&self.base_url, href))
            .collect();
        discovered.sort();
        for route in COMMON_POLICY_ROUTES {
            discovered.push(format!("{}{}", self.base_url, route));
        }
        let mut unique = unique_keep_order(discovered);
        unique.truncate(DISCOVERED_LINK_CAP);
        unique
    }
}

/// Extracts a brand profile from a storefront root URL
///
/// Normalizes the URL, confirms the root is reachable (the hard gate:
/// failure here means "site not usable", surfaced as
/// [`crate::ShopscopeError::UnreachableSite`]), then runs the pipeline.
/// The fetch client is scoped to this call and released on every exit
/// path.
pub async fn extract_brand(url: &str, config: &Config) -> Result<BrandRecord> {
    let client = FetchClient::new(&config.fetch)?;
    let root = client.ensure_root_reachable(url).await?;
    let extractor = BrandExtractor::new(client, root, config.clone());
    Ok(extractor.extract().await)
}

/// Extracts several storefronts with bounded concurrency
///
/// Each extraction owns its own fetch client and shares nothing with
/// its siblings; at most `config.extract.concurrency` run at once.
/// Results come back in input order, one per URL, and one unreachable
/// site does not affect the others.
pub async fn extract_many(urls: &[String], config: &Config) -> Vec<Result<BrandRecord>> {
    let semaphore = Arc::new(Semaphore::new(config.extract.concurrency));

    let handles: Vec<_> = urls
        .iter()
        .map(|url| {
            let url = url.clone();
            let config = config.clone();
            let semaphore = Arc::clone(&semaphore);
            tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                extract_brand(&url, &config).await
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(result) => results.push(result),
            Err(e) => results.push(Err(e.into())),
        }
    }
    results
}
