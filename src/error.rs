//! Crate-wide error type.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Lexicon, words file, or doc-lengths file malformed, or a varbyte
    /// stream ran out of input before hitting its terminator byte.
    #[error("format error: {0}")]
    Format(String),

    /// A term appearing in the sorted postings stream has no entry in the
    /// document-frequency (words) file. Fatal at build time.
    #[error("term '{0}' missing from document-frequency table")]
    Corpus(String),

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for SearchError {
    fn from(err: bincode::Error) -> Self {
        SearchError::Serialization(err.to_string())
    }
}
