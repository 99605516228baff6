//! Query-text tokenization.
//!
//! Splits on any non-alphanumeric byte, lowercases, drops empty tokens, and
//! caps the term count at 20 — matching `parse_term`'s `strtok` delimiter
//! set and the query loop's term-count ceiling in the source processor.

/// Maximum number of terms accepted from a single query line.
pub const MAX_QUERY_TERMS: usize = 20;

pub fn tokenize(query: &str) -> Vec<String> {
    query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_lowercase())
        .take(MAX_QUERY_TERMS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_punctuation_and_lowercases() {
        let terms = tokenize("Rust, systems-programming!! Yes.");
        assert_eq!(terms, vec!["rust", "systems", "programming", "yes"]);
    }

    #[test]
    fn empty_and_whitespace_only_query_yields_no_terms() {
        assert!(tokenize("   ").is_empty());
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn caps_at_twenty_terms() {
        let query: String = (0..30).map(|i| format!("w{i} ")).collect();
        assert_eq!(tokenize(&query).len(), MAX_QUERY_TERMS);
    }
}
