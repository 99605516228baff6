//! Disk-resident inverted-index search engine.
//!
//! Block-compressed postings, a text-format lexicon, document-at-a-time
//! conjunctive/disjunctive evaluation, and BM25 ranking over a bounded
//! top-K heap.
//!
//! ## Layout
//! - [`index`]: the on-disk format — varbyte codec, block buffering, the
//!   lexicon, the streaming builder, the postings cursor, DAAT evaluation,
//!   BM25 scoring, and the top-K heap.
//! - [`query`]: query-text tokenization and the [`query::IndexHandle`] that
//!   ties a built index together for querying.
//! - [`config`]: BM25 and index build/query tunables.
//! - [`error`]: the crate-wide error type.

pub mod config;
pub mod index;
pub mod query;

mod error;

pub use config::{BM25Config, SearchConfig};
pub use error::{Result, SearchError};
pub use index::{IndexBuilder, Lexicon, LexiconEntry};
pub use query::{IndexHandle, Mode};
