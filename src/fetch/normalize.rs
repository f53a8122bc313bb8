//! URL normalization and absolutization
//!
//! These are deliberately string-level, permissive operations: storefront
//! operators type URLs without schemes and themes emit protocol-relative
//! and site-relative hrefs, none of which a strict URL parser accepts
//! as-is. The rules are small enough to state exactly, and idempotent.

/// Normalizes a root URL string
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Prefix `https://` if no `http://`/`https://` scheme is present
///    (case-insensitive check)
/// 3. Strip trailing slashes
///
/// Pure and total: any input produces some output, and the function is
/// idempotent (`normalize_url(normalize_url(u)) == normalize_url(u)`).
///
/// # Examples
///
/// ```
/// use shopscope::fetch::normalize_url;
///
/// assert_eq!(normalize_url("  example.com/ "), "https://example.com");
/// assert_eq!(normalize_url("http://example.com"), "http://example.com");
/// ```
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();
    let lower = trimmed.to_ascii_lowercase();
    let with_scheme = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };
    with_scheme.trim_end_matches('/').to_string()
}

/// Resolves an href against a site root, producing an absolute URL
///
/// Handles the four shapes storefront markup actually contains:
///
/// * already absolute (`https://...`, `http://...`): passed through
/// * protocol-relative (`//cdn.example.com/x`): given `https:`
/// * root-relative (`/pages/about`): joined to the base
/// * bare (`pages/about`): joined to the base with a separating `/`
///
/// The base is treated as having no trailing slash (the pipeline always
/// passes a normalized root).
pub fn absolutize(base: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    if let Some(rest) = href.strip_prefix("//") {
        return format!("https://{}", rest);
    }
    let base = base.trim_end_matches('/');
    if href.starts_with('/') {
        format!("{}{}", base, href)
    } else {
        format!("{}/{}", base, href)
    }
}
