//! Plain-text normalization shared by model types.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Collapses whitespace runs to one space and trims both ends.
pub fn collapse_whitespace(value: &str) -> String {
    WHITESPACE_RE.replace_all(value, " ").trim().to_string()
}

/// Returns the whitespace-collapsed text capped at `max_chars`, with a `...`
/// suffix when anything was cut.
pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    let normalized = collapse_whitespace(value);
    if normalized.chars().count() <= max_chars {
        return normalized;
    }
    let mut truncated = normalized.chars().take(max_chars).collect::<String>();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::{collapse_whitespace, truncate_chars};

    #[test]
    fn collapse_whitespace_joins_runs_and_trims() {
        assert_eq!(collapse_whitespace("  early \n\t years  "), "early years");
    }

    #[test]
    fn truncate_chars_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("ääää", 4), "ääää");
        assert_eq!(truncate_chars("äääää", 4), "ääää...");
    }
}
