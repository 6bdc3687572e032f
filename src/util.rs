//! Shared helpers used across the codebase.

/// Truncate a string to at most `max_chars` characters, appending "..." if
/// anything was cut. Truncation happens on character boundaries so multi-byte
/// UTF-8 content (emoji, CJK) never panics.
pub fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", s[..idx].trim_end()),
        None => s.to_string(),
    }
}
