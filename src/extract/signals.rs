//! HTML signal extractors
//!
//! Stateless functions over a parsed document or raw HTML text:
//! brand-name detection, keyword link discovery, email/phone extraction,
//! social-handle matching, embedded structured-FAQ extraction, and the
//! heading-based FAQ fallback. None of these perform I/O, and all
//! `scraper` documents stay inside synchronous calls (`scraper::Html`
//! is not `Send`, so it must never be held across an await point).
//!
//! Patterns live in fixed-order tables so precedence is explicit and
//! each entry is testable in isolation.

use crate::extract::text::{clean_text, truncate_chars};
use crate::model::{FaqItem, Product, SocialHandles};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Compiled regex tables, built once per process
struct SignalPatterns {
    email: Regex,
    phone_loose: Regex,
    phone_cleaned: Regex,
    phone_strict: Regex,
    product_link: Regex,
    /// Platform name -> pattern, in fixed output order
    socials: Vec<(&'static str, Regex)>,
}

fn patterns() -> &'static SignalPatterns {
    static PATTERNS: OnceLock<SignalPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| SignalPatterns {
        email: Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
            .expect("valid email pattern"),
        phone_loose: Regex::new(r"\+?\d[\d\-\s]{7,}\d").expect("valid phone pattern"),
        phone_cleaned: Regex::new(r"^(\+?\d{10}|\+\d{11,13})$")
            .expect("valid cleaned-phone pattern"),
        phone_strict: Regex::new(r"^\+\d{1,3}-\d{7,15}$").expect("valid strict-phone pattern"),
        product_link: Regex::new(r"(?i)/products/[^/]+/?$").expect("valid product-link pattern"),
        socials: vec![
            ("instagram", social(r"instagram\.com")),
            ("facebook", social(r"(facebook|fb)\.com")),
            ("tiktok", social(r"tiktok\.com")),
            ("twitter", social(r"(twitter|x)\.com")),
            ("youtube", social(r"youtube\.com")),
            ("pinterest", social(r"pinterest\.com")),
            ("linkedin", social(r"linkedin\.com")),
        ],
    })
}

fn social(domain: &str) -> Regex {
    Regex::new(&format!(r#"(?i){}/[^"'>\s]+"#, domain)).expect("valid social pattern")
}

/// Parsed CSS selectors, built once per process
struct Selectors {
    title: Selector,
    og_site_name: Selector,
    anchor: Selector,
    jsonld: Selector,
    headings: Selector,
    main: Selector,
}

fn selectors() -> &'static Selectors {
    static SELECTORS: OnceLock<Selectors> = OnceLock::new();
    SELECTORS.get_or_init(|| Selectors {
        title: Selector::parse("title").expect("valid selector"),
        og_site_name: Selector::parse(r#"meta[property="og:site_name"]"#)
            .expect("valid selector"),
        anchor: Selector::parse("a[href]").expect("valid selector"),
        jsonld: Selector::parse(r#"script[type="application/ld+json"]"#)
            .expect("valid selector"),
        headings: Selector::parse("h2, h3").expect("valid selector"),
        main: Selector::parse("main").expect("valid selector"),
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Detects the brand name from a parsed homepage
///
/// Prefers the `<title>`, truncated at the first `|` and trimmed (store
/// titles are conventionally `Brand | Tagline`); falls back to the
/// `og:site_name` meta tag; else `None`.
pub fn extract_brand_name(doc: &Html) -> Option<String> {
    let sel = selectors();

    if let Some(title) = doc.select(&sel.title).next() {
        let text = element_text(title);
        let name = text.split('|').next().unwrap_or("").trim().to_string();
        if !name.is_empty() {
            return Some(name);
        }
    }

    doc.select(&sel.og_site_name)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
}

/// Scans all anchors for keyword matches, returning keyword -> href
///
/// A keyword matches when it appears (case-insensitively) in either the
/// anchor's visible text or its href. The map is keyed by keyword, so
/// the last matching anchor per keyword wins; callers wanting the first
/// match should scan anchors in document order themselves.
pub fn find_links(doc: &Html, keywords: &[&str]) -> HashMap<String, String> {
    let mut links = HashMap::new();
    for anchor in doc.select(&selectors().anchor) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        let text = element_text(anchor).to_lowercase();
        let href_lower = href.to_lowercase();
        for keyword in keywords {
            if text.contains(keyword) || href_lower.contains(keyword) {
                links.insert((*keyword).to_string(), href.to_string());
            }
        }
    }
    links
}

/// Extracts email addresses from raw HTML text, sorted and deduplicated
pub fn extract_emails(html: &str) -> Vec<String> {
    let mut emails: Vec<String> = patterns()
        .email
        .find_iter(html)
        .map(|m| m.as_str().to_string())
        .collect();
    emails.sort();
    emails.dedup();
    emails
}

/// Extracts phone-number candidates from raw HTML text
///
/// A loose digit-run pattern finds candidates; a cleanup pass strips
/// everything but digits and `+` and keeps only plausible shapes: a
/// 10-digit local number (optionally `+`-prefixed) or a country-coded
/// `+` run of 11-13 digits. Strict canonicalization happens later, at
/// record assembly ([`canonicalize_phone`]); only the country-coded
/// shapes can survive it.
pub fn extract_phone_candidates(html: &str) -> Vec<String> {
    let pats = patterns();
    let mut raw: Vec<String> = pats
        .phone_loose
        .find_iter(html)
        .map(|m| m.as_str().to_string())
        .collect();
    raw.sort();
    raw.dedup();

    let mut cleaned: Vec<String> = raw
        .iter()
        .map(|num| strip_to_digits_and_plus(num))
        .filter(|num| pats.phone_cleaned.is_match(num))
        .collect();
    cleaned.sort();
    cleaned.dedup();
    cleaned
}

fn strip_to_digits_and_plus(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Canonicalizes a phone candidate into the strict `+CC-NUMBER` form
///
/// This is a filter, not a transform: the output either matches
/// `+<1-3 digits>-<7-15 digits>` exactly or the candidate is dropped.
///
/// * A candidate already in exact canonical form passes verbatim.
/// * A `+`-prefixed candidate with 11-13 digits after cleanup splits as
///   leading digits = country code, trailing 10 digits = local number.
/// * Everything else, including bare digit runs with no country-code
///   evidence, yields `None`.
pub fn canonicalize_phone(candidate: &str) -> Option<String> {
    let pats = patterns();
    let trimmed = candidate.trim();
    if pats.phone_strict.is_match(trimmed) {
        return Some(trimmed.to_string());
    }

    let cleaned = strip_to_digits_and_plus(trimmed);
    let digits = cleaned.strip_prefix('+')?;
    if digits.contains('+') || !(11..=13).contains(&digits.len()) {
        return None;
    }
    let (cc, local) = digits.split_at(digits.len() - 10);
    Some(format!("+{}-{}", cc, local))
}

/// Matches one handle URL per known social platform from raw HTML
///
/// First match per platform wins; platforms without a match stay absent.
pub fn extract_socials(html: &str) -> SocialHandles {
    let mut handles = SocialHandles::default();
    for (platform, pattern) in &patterns().socials {
        let found = pattern.find(html).map(|m| m.as_str().to_string());
        match *platform {
            "instagram" => handles.instagram = found,
            "facebook" => handles.facebook = found,
            "tiktok" => handles.tiktok = found,
            "twitter" => handles.twitter = found,
            "youtube" => handles.youtube = found,
            "pinterest" => handles.pinterest = found,
            "linkedin" => handles.linkedin = found,
            _ => {}
        }
    }
    handles
}

/// Extracts FAQ pairs from embedded `application/ld+json` blocks
///
/// Each script block is parsed as JSON (silently skipped on failure).
/// Objects (or elements of a top-level array) whose `@type` is
/// `FAQPage` contribute their `mainEntity` question list; entries
/// missing either the question or the answer are skipped. Answers from
/// structured data are not capped.
pub fn extract_jsonld_faqs(doc: &Html) -> Vec<FaqItem> {
    let mut faqs = Vec::new();
    for script in doc.select(&selectors().jsonld) {
        let raw = script.text().collect::<String>();
        let Ok(data) = serde_json::from_str::<serde_json::Value>(&raw) else {
            continue;
        };
        let blocks = match data {
            serde_json::Value::Array(items) => items,
            other => vec![other],
        };
        for block in blocks {
            if block.get("@type").and_then(|t| t.as_str()) != Some("FAQPage") {
                continue;
            }
            let Some(entities) = block.get("mainEntity").and_then(|e| e.as_array()) else {
                continue;
            };
            for item in entities {
                let question = item
                    .get("name")
                    .or_else(|| item.get("question"))
                    .and_then(|q| q.as_str())
                    .map(str::trim)
                    .filter(|q| !q.is_empty());
                let answer = item
                    .get("acceptedAnswer")
                    .and_then(|a| a.get("text"))
                    .and_then(|a| a.as_str())
                    .map(str::trim)
                    .filter(|a| !a.is_empty());
                if let (Some(question), Some(answer)) = (question, answer) {
                    faqs.push(FaqItem {
                        question: question.to_string(),
                        answer: answer.to_string(),
                    });
                }
            }
        }
    }
    faqs
}

/// Heuristic FAQ fallback: pairs `h2`/`h3` headings with following text
///
/// Each heading's question is its own text; the answer is the text of
/// its next sibling element, capped at `max_answer_chars`. Yields at
/// most `max_pairs` items. Only used when no structured FAQ data exists.
pub fn extract_heading_faqs(doc: &Html, max_answer_chars: usize, max_pairs: usize) -> Vec<FaqItem> {
    let mut faqs = Vec::new();
    for heading in doc.select(&selectors().headings) {
        if faqs.len() >= max_pairs {
            break;
        }
        let question = element_text(heading);
        if question.is_empty() {
            continue;
        }
        let Some(sibling) = heading.next_siblings().find_map(ElementRef::wrap) else {
            continue;
        };
        let Some(answer) = clean_text(Some(&element_text(sibling))).filter(|a| !a.is_empty())
        else {
            continue;
        };
        faqs.push(FaqItem {
            question,
            answer: truncate_chars(&answer, max_answer_chars),
        });
    }
    faqs
}

/// Finds products featured directly on the homepage
///
/// Scans anchors whose href is a direct product-page URL (path ending
/// in `/products/<segment>`), using the anchor text as the title.
/// Deduplicated by URL in discovery order, capped at `cap`.
pub fn extract_hero_products(doc: &Html, cap: usize) -> Vec<Product> {
    let mut seen = std::collections::HashSet::new();
    let mut products = Vec::new();
    for anchor in doc.select(&selectors().anchor) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !patterns().product_link.is_match(href) {
            continue;
        }
        if !seen.insert(href.to_string()) {
            continue;
        }
        let title = Some(element_text(anchor)).filter(|t| !t.is_empty());
        products.push(Product {
            title,
            url: Some(href.to_string()),
            ..Default::default()
        });
        if products.len() >= cap {
            break;
        }
    }
    products
}

/// Extracts the principal content text of a page
///
/// Prefers the first `<main>` element; falls back to the whole document.
/// Text nodes are joined with single spaces; the caller applies
/// cleaning and truncation.
pub fn main_region_text(doc: &Html) -> String {
    if let Some(main) = doc.select(&selectors().main).next() {
        element_text(main)
    } else {
        doc.root_element()
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
