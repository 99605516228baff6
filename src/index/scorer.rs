//! BM25 scoring.
//!
//! ```text
//! idf    = ln((N - df + 0.5) / (df + 0.5) + 1)
//! tf     = f * (k1 + 1) / (f + k1 * (1 - b + b * (len / avg_dl)))
//! score += idf * tf
//! ```
//!
//! Computed fresh from the raw stored frequency on every query, per the
//! spec's explicit mandate against precomputed/cached per-posting scores.

use crate::config::BM25Config;

/// Inverse document frequency for a term with document frequency `df` in a
/// corpus of `n_docs` documents. Always non-negative for `df <= n_docs`.
pub fn idf(n_docs: u32, df: u32) -> f32 {
    let n = n_docs as f32;
    let df = df as f32;
    ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
}

/// BM25 contribution of a single term occurring `freq` times in a document
/// of length `doc_len`, given the term's precomputed `idf`.
pub fn term_score(cfg: &BM25Config, idf: f32, freq: u32, doc_len: u32) -> f32 {
    let f = freq as f32;
    let len_norm = 1.0 - cfg.b + cfg.b * (doc_len as f32 / cfg.avg_doc_length);
    let tf = f * (cfg.k1 + 1.0) / (f + cfg.k1 * len_norm);
    idf * tf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idf_is_positive_for_rare_terms_and_shrinks_as_df_grows() {
        let rare = idf(1000, 1);
        let common = idf(1000, 500);
        assert!(rare > 0.0);
        assert!(rare > common);
    }

    #[test]
    fn term_score_increases_with_frequency() {
        let cfg = BM25Config::default();
        let i = idf(1000, 10);
        let low = term_score(&cfg, i, 1, 50);
        let high = term_score(&cfg, i, 5, 50);
        assert!(high > low);
    }

    #[test]
    fn term_score_decreases_as_doc_length_grows_past_average() {
        let cfg = BM25Config::default();
        let i = idf(1000, 10);
        let short = term_score(&cfg, i, 3, 20);
        let long = term_score(&cfg, i, 3, 2000);
        assert!(short > long);
    }

    #[test]
    fn matches_worked_example_from_spec_scenarios() {
        // N=10, avg_dl=5.0, k1=1.2, b=0.75: a term with df=2, freq=1 in a
        // document of length 5 (== avg_dl, so length normalization is 1).
        let cfg = BM25Config {
            k1: 1.2,
            b: 0.75,
            avg_doc_length: 5.0,
        };
        let i = idf(10, 2);
        let score = term_score(&cfg, i, 1, 5);
        let expected_idf = ((10.0f32 - 2.0 + 0.5) / (2.0 + 0.5) + 1.0).ln();
        assert!((i - expected_idf).abs() < 1e-6);
        let expected_tf = 1.0 * 2.2 / (1.0 + 1.2);
        assert!((score - expected_idf * expected_tf).abs() < 1e-5);
    }
}
