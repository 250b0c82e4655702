//! String utilities for the domain layer.

/// Keep at most `max_words` whitespace-separated words, appending `...` when cut.
pub fn truncate_words(s: &str, max_words: usize) -> String {
    let words: Vec<&str> = s.split_whitespace().collect();
    if words.len() > max_words {
        format!("{}...", words[..max_words].join(" "))
    } else {
        s.trim().to_string()
    }
}

/// Trimmed, non-empty string or `None`
pub fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
