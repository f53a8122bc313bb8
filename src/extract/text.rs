//! Text normalization helpers used throughout the pipeline

/// Collapses whitespace runs to single spaces and trims the ends
///
/// `None` passes through unchanged so callers can thread optional
/// fields without unwrapping.
pub fn clean_text(text: Option<&str>) -> Option<String> {
    let text = text?;
    let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
    Some(cleaned)
}

/// Removes duplicates while preserving first-occurrence order
///
/// Used wherever discovery order matters to downstream consumers
/// (discovered-link lists, hero products), as opposed to plain sets
/// where order is irrelevant.
pub fn unique_keep_order<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for item in items {
        let item = item.into();
        if seen.insert(item.clone()) {
            out.push(item);
        }
    }
    out
}

/// Hard-truncates a string to at most `max` characters
///
/// Character-based, not byte-based, so multibyte text never truncates
/// mid-codepoint. Truncation, never summarization.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        text.chars().take(max).collect()
    }
}
