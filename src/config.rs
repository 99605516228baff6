//! BM25 and index build/query configuration.
//!
//! Provides the tunables named by the spec: the BM25 parameters (`k1`, `b`,
//! `avg_doc_length`), the physical block size, and the default top-K used by
//! the batch query interface.

use serde::{Deserialize, Serialize};

/// BM25 ranking parameters.
///
/// ```text
/// tf     = f * (k1+1) / (f + k1*(1 - b + b*(d/avg_dl)))
/// idf    = ln((N - df + 0.5) / (df + 0.5) + 1)
/// score += idf * tf
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BM25Config {
    /// Term-frequency saturation parameter.
    pub k1: f32,
    /// Length-normalization parameter.
    pub b: f32,
    /// Average document length across the corpus, in tokens.
    pub avg_doc_length: f32,
}

impl Default for BM25Config {
    fn default() -> Self {
        Self {
            k1: 1.2,
            b: 0.75,
            avg_doc_length: 66.93,
        }
    }
}

/// Physical block size for the postings file: 64 KiB, fixed by the format.
///
/// Exposed as a named constant rather than hardcoded so tests can build
/// tiny multi-block fixtures with [`SearchConfig::block_size`] instead.
pub const DEFAULT_BLOCK_SIZE: usize = 64 * 1024;

/// Build- and query-time configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// BM25 parameters.
    pub bm25: BM25Config,
    /// Size of a physical block, in bytes. Always [`DEFAULT_BLOCK_SIZE`] for
    /// a real on-disk index; tests may shrink it to exercise multi-block
    /// posting lists without generating gigabytes of fixture data.
    pub block_size: usize,
    /// Default top-K for the batch query interface when the caller does not
    /// specify one explicitly.
    pub default_top_k: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            bm25: BM25Config::default(),
            block_size: DEFAULT_BLOCK_SIZE,
            default_top_k: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bm25_matches_spec_constants() {
        let cfg = BM25Config::default();
        assert_eq!(cfg.k1, 1.2);
        assert_eq!(cfg.b, 0.75);
        assert!((cfg.avg_doc_length - 66.93).abs() < 1e-6);
    }

    #[test]
    fn default_search_config() {
        let cfg = SearchConfig::default();
        assert_eq!(cfg.block_size, DEFAULT_BLOCK_SIZE);
        assert_eq!(cfg.default_top_k, 10);
    }
}
