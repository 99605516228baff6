//! Loader for the external words/document-frequency file.
//!
//! The builder consumes a stream of sorted `(term, doc_id, freq)` postings
//! but needs each term's document frequency up front to size its lexicon
//! entry; that comes from a side file of `term count` pairs, one per line,
//! matching the source's separate word-list input.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ahash::RandomState;

use crate::error::{Result, SearchError};

/// term -> document frequency, loaded once and consulted by the builder.
#[derive(Debug, Default)]
pub struct WordsFile {
    df: HashMap<String, u32, RandomState>,
}

impl WordsFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut df = HashMap::default();
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split_whitespace();
            let term = fields
                .next()
                .ok_or_else(|| malformed(lineno))?
                .to_string();
            let count: u32 = fields
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| malformed(lineno))?;
            df.insert(term, count);
        }
        Ok(Self { df })
    }

    /// Document frequency for `term`. Returns [`SearchError::Corpus`] if the
    /// term never appeared in the words file: a sorted-postings input
    /// referencing a term absent from the df table indicates a build
    /// pipeline inconsistency and is treated as fatal, not skipped.
    pub fn df_of(&self, term: &str) -> Result<u32> {
        self.df
            .get(term)
            .copied()
            .ok_or_else(|| SearchError::Corpus(term.to_string()))
    }

    pub fn len(&self) -> usize {
        self.df.len()
    }

    pub fn is_empty(&self) -> bool {
        self.df.is_empty()
    }
}

fn malformed(lineno: usize) -> SearchError {
    SearchError::Format(format!("words file line {}: malformed", lineno + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_and_looks_up_document_frequency() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "rust 12").unwrap();
        writeln!(f, "systems 4").unwrap();
        drop(f);

        let words = WordsFile::load(&path).unwrap();
        assert_eq!(words.df_of("rust").unwrap(), 12);
        assert_eq!(words.len(), 2);
    }

    #[test]
    fn missing_term_is_a_corpus_error() {
        let words = WordsFile::default();
        assert!(matches!(
            words.df_of("ghost"),
            Err(SearchError::Corpus(_))
        ));
    }
}
