//! Streaming index builder.
//!
//! Consumes postings in `(term, doc_id, freq)` order — sorted by term, then
//! by ascending doc-id within a term — and emits the block-compressed
//! postings file plus the in-memory [`Lexicon`], mirroring
//! `create_inverted_index`/`insert_posting` from the source builder: pad
//! and flush a block pair when the next posting would overflow it, and
//! record each term's starting/ending block coordinates and per-block
//! `last[]` doc-ids as it goes.
//!
//! Repeated `(term, doc_id)` pairs are coalesced by summing their
//! frequencies rather than emitting duplicate postings, since the same
//! term can be tokenized more than once per document by an upstream
//! tokenizer before reaching the sorted-postings stage.

use std::io::Write;

use crate::error::{Result, SearchError};
use crate::index::block::BlockWriter;
use crate::index::codec;
use crate::index::lexicon::{Lexicon, LexiconEntry};
use crate::index::wordsfile::WordsFile;

struct TermState {
    term: String,
    last_doc: u32,
    produced: u32,
    start_d_block: u32,
    start_d_offset: u32,
    start_f_offset: u32,
    last_per_block: Vec<u32>,
    /// Most recently seen `(doc_id, freq)` for this term, not yet written
    /// to the block writer. Held back so a repeated doc-id can still be
    /// merged into it instead of producing a duplicate posting.
    pending: Option<(u32, u32)>,
}

pub struct IndexBuilder<W: Write> {
    writer: BlockWriter<W>,
    lexicon: Lexicon,
    words: WordsFile,
    state: Option<TermState>,
}

impl<W: Write> IndexBuilder<W> {
    pub fn new(writer: W, words: WordsFile, block_size: usize) -> Self {
        Self {
            writer: BlockWriter::new(writer, block_size),
            lexicon: Lexicon::new(),
            words,
            state: None,
        }
    }

    /// Feeds one posting. `term`s must arrive sorted (all postings for a
    /// term contiguous) and `doc_id`s ascending within a term; violating
    /// either is a [`SearchError::Format`].
    pub fn add_posting(&mut self, term: &str, doc_id: u32, freq: u32) -> Result<()> {
        let same_term = self
            .state
            .as_ref()
            .map(|s| s.term == term)
            .unwrap_or(false);
        if !same_term {
            self.finalize_current_term()?;
            self.start_term(term)?;
        }

        let state = self.state.as_mut().expect("just started or already open");
        match state.pending {
            Some((pending_doc, pending_freq)) if pending_doc == doc_id => {
                state.pending = Some((pending_doc, pending_freq + freq));
            }
            Some((pending_doc, _)) if pending_doc > doc_id => {
                return Err(SearchError::Format(format!(
                    "postings out of order for term '{term}': doc {doc_id} after {pending_doc}"
                )));
            }
            Some(pending) => {
                write_posting(&mut self.writer, state, pending)?;
                state.pending = Some((doc_id, freq));
            }
            None => {
                state.pending = Some((doc_id, freq));
            }
        }
        Ok(())
    }

    fn start_term(&mut self, term: &str) -> Result<()> {
        self.state = Some(TermState {
            term: term.to_string(),
            last_doc: 0,
            produced: 0,
            start_d_block: self.writer.block_index() as u32,
            start_d_offset: self.writer.d_offset() as u32,
            start_f_offset: self.writer.f_offset() as u32,
            last_per_block: Vec::new(),
            pending: None,
        });
        Ok(())
    }

    fn finalize_current_term(&mut self) -> Result<()> {
        let Some(mut state) = self.state.take() else {
            return Ok(());
        };
        if let Some(pending) = state.pending.take() {
            write_posting(&mut self.writer, &mut state, pending)?;
        }

        let df = self.words.df_of(&state.term)?;
        if df != state.produced {
            return Err(SearchError::Format(format!(
                "term '{}': words file reports df={df} but {} postings were written",
                state.term, state.produced
            )));
        }

        let last_d_offset = self.writer.d_len() as u32;
        let last_f_offset = self.writer.f_len() as u32;
        let mut last = state.last_per_block;
        last.push(state.last_doc);
        let last_d_block = state.start_d_block + (last.len() as u32 - 1) * 2;

        self.lexicon.insert(
            state.term,
            LexiconEntry {
                df,
                start_d_block: state.start_d_block,
                start_d_offset: state.start_d_offset,
                start_f_offset: state.start_f_offset,
                last_d_block,
                last_d_offset,
                last_f_offset,
                last_did: state.last_doc,
                num_blocks: last.len() as u32,
                last,
            },
        );
        Ok(())
    }

    /// Flushes the final term and the trailing block pair, returning the
    /// built lexicon and the underlying writer.
    pub fn finish(mut self) -> Result<(Lexicon, W)> {
        self.finalize_current_term()?;
        let w = self.writer.finish()?;
        Ok((self.lexicon, w))
    }
}

fn write_posting<W: Write>(
    writer: &mut BlockWriter<W>,
    state: &mut TermState,
    (doc_id, freq): (u32, u32),
) -> Result<()> {
    let (doc_bytes, doc_len) = codec::encode(doc_id);
    let (freq_bytes, freq_len) = codec::encode(freq);
    if writer.would_overflow(doc_len, freq_len) {
        state.last_per_block.push(state.last_doc);
        writer.flush_pair()?;
    }
    writer.append_doc_bytes(&doc_bytes[..doc_len]);
    writer.append_freq_bytes(&freq_bytes[..freq_len]);
    state.last_doc = doc_id;
    state.produced += 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::cursor::Cursor;
    use crate::index::source::FileIndexSource;
    use std::sync::Arc;

    fn words_with(entries: &[(&str, u32)]) -> WordsFile {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        let mut f = std::fs::File::create(&path).unwrap();
        for (term, df) in entries {
            writeln!(f, "{term} {df}").unwrap();
        }
        drop(f);
        WordsFile::load(&path).unwrap()
    }

    use std::io::Write as _;

    #[test]
    fn builds_lexicon_entries_readable_by_cursor() {
        let words = words_with(&[("alpha", 3), ("beta", 2)]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("postings.bin");
        let file = std::fs::File::create(&path).unwrap();
        let mut builder = IndexBuilder::new(file, words, 4096);

        builder.add_posting("alpha", 0, 2).unwrap();
        builder.add_posting("alpha", 3, 1).unwrap();
        builder.add_posting("alpha", 7, 4).unwrap();
        builder.add_posting("beta", 1, 1).unwrap();
        builder.add_posting("beta", 2, 5).unwrap();

        let (lexicon, _file) = builder.finish().unwrap();
        assert_eq!(lexicon.len(), 2);

        let alpha = lexicon.get("alpha").unwrap().clone();
        assert_eq!(alpha.df, 3);
        assert_eq!(alpha.last_did(), 7);

        let source: Arc<dyn crate::index::source::IndexSource> =
            Arc::new(FileIndexSource::open(&path).unwrap());
        let mut cursor = Cursor::open(alpha, source, 4096);
        let mut out = Vec::new();
        while let Some((doc, freq)) = cursor.current().unwrap() {
            out.push((doc, freq));
            cursor.advance().unwrap();
        }
        assert_eq!(out, vec![(0, 2), (3, 1), (7, 4)]);
    }

    #[test]
    fn repeated_doc_id_is_coalesced_by_summing_frequency() {
        let words = words_with(&[("dup", 2)]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("postings.bin");
        let file = std::fs::File::create(&path).unwrap();
        let mut builder = IndexBuilder::new(file, words, 4096);

        builder.add_posting("dup", 5, 1).unwrap();
        builder.add_posting("dup", 5, 2).unwrap();
        builder.add_posting("dup", 6, 1).unwrap();

        let (lexicon, _) = builder.finish().unwrap();
        let entry = lexicon.get("dup").unwrap().clone();
        assert_eq!(entry.df, 2);

        let source: Arc<dyn crate::index::source::IndexSource> =
            Arc::new(FileIndexSource::open(&path).unwrap());
        let mut cursor = Cursor::open(entry, source, 4096);
        assert_eq!(cursor.current().unwrap(), Some((5, 3)));
        cursor.advance().unwrap();
        assert_eq!(cursor.current().unwrap(), Some((6, 1)));
    }

    #[test]
    fn out_of_order_doc_ids_are_rejected() {
        let words = words_with(&[("x", 2)]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("postings.bin");
        let file = std::fs::File::create(&path).unwrap();
        let mut builder = IndexBuilder::new(file, words, 4096);
        builder.add_posting("x", 5, 1).unwrap();
        assert!(builder.add_posting("x", 2, 1).is_err());
    }

    #[test]
    fn df_mismatch_against_words_file_is_rejected() {
        let words = words_with(&[("x", 5)]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("postings.bin");
        let file = std::fs::File::create(&path).unwrap();
        let mut builder = IndexBuilder::new(file, words, 4096);
        builder.add_posting("x", 1, 1).unwrap();
        assert!(builder.finish().is_err());
    }
}
