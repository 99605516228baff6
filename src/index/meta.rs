//! Small binary metadata file recorded alongside the lexicon and postings
//! file: the corpus-wide constants BM25 needs (`N`, `avg_doc_length`) so a
//! query-time process doesn't have to rescan the doc-lengths file just to
//! recompute them.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::index::doctable::DocTable;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexMeta {
    pub doc_count: u32,
    pub avg_doc_length: f32,
}

impl IndexMeta {
    pub fn from_doc_table(doc_table: &DocTable) -> Self {
        Self {
            doc_count: doc_table.doc_count(),
            avg_doc_length: doc_table.average_length(),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let w = BufWriter::new(File::create(path)?);
        bincode::serialize_into(w, self)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let r = BufReader::new(File::open(path)?);
        Ok(bincode::deserialize_from(r)?)
    }
}
