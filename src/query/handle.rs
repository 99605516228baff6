//! Ties the lexicon, doc table, and postings source together into the
//! handle callers actually query against.

use std::path::Path;
use std::sync::Arc;

use log::warn;

use crate::config::SearchConfig;
use crate::error::Result;
use crate::index::{
    daat, Cursor, DocTable, FileIndexSource, IndexSource, Lexicon, ScoredDoc,
};
use crate::query::tokenizer::tokenize;

/// Whether multi-term queries require every term to match (AND) or any
/// term to match (OR).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Conjunctive,
    Disjunctive,
}

/// An opened, query-ready index: lexicon and doc table held in memory,
/// postings read lazily from `source` per query.
pub struct IndexHandle {
    lexicon: Lexicon,
    doc_table: DocTable,
    source: Arc<dyn IndexSource>,
    config: SearchConfig,
}

impl IndexHandle {
    pub fn new(
        lexicon: Lexicon,
        doc_table: DocTable,
        source: Arc<dyn IndexSource>,
        config: SearchConfig,
    ) -> Self {
        Self {
            lexicon,
            doc_table,
            source,
            config,
        }
    }

    /// Opens a built index from its lexicon file, doc-lengths file, and
    /// postings file, using plain seek+read I/O.
    pub fn open(
        lexicon_path: impl AsRef<Path>,
        doc_lengths_path: impl AsRef<Path>,
        postings_path: impl AsRef<Path>,
        config: SearchConfig,
    ) -> Result<Self> {
        let lexicon = Lexicon::load(lexicon_path)?;
        let doc_table = DocTable::load(doc_lengths_path)?;
        let source: Arc<dyn IndexSource> = Arc::new(FileIndexSource::open(postings_path)?);
        Ok(Self::new(lexicon, doc_table, source, config))
    }

    pub fn doc_count(&self) -> u32 {
        self.doc_table.doc_count()
    }

    /// Tokenizes `query`, resolves each term to a cursor, and evaluates it
    /// in the given mode, returning up to `top_k` ranked results.
    ///
    /// Terms absent from the lexicon are dropped with a warning and simply
    /// excluded from evaluation, in both modes: a conjunctive query with an
    /// unknown term among otherwise-known terms still evaluates over the
    /// terms that did resolve, rather than forcing an empty result.
    pub fn evaluate(&self, query: &str, mode: Mode, top_k: usize) -> Result<Vec<ScoredDoc>> {
        let terms = tokenize(query);
        let mut cursors: Vec<Cursor> = Vec::with_capacity(terms.len());
        for term in &terms {
            match self.lexicon.get(term) {
                Some(entry) => cursors.push(Cursor::open(
                    entry.clone(),
                    self.source.clone(),
                    self.config.block_size,
                )),
                None => warn!("query term '{term}' not found in lexicon"),
            }
        }
        if cursors.is_empty() {
            return Ok(Vec::new());
        }
        // Shortest-list-first ordering speeds the conjunctive pivot; it is
        // harmless (and unnecessary but still correct) for disjunctive mode.
        cursors.sort_by_key(|c| c.document_frequency());

        let n = self.doc_count();
        match mode {
            Mode::Conjunctive => {
                daat::conjunctive(&mut cursors, &self.doc_table, &self.config.bm25, n, top_k)
            }
            Mode::Disjunctive => {
                daat::disjunctive(&mut cursors, &self.doc_table, &self.config.bm25, n, top_k)
            }
        }
    }
}
