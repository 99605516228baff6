//! Postings cursor: lazy, block-skipping iteration over one term's list.
//!
//! Doc-ids and frequencies are both stored as absolute values, each
//! varbyte-encoded into their own block stream. A [`Cursor`] decodes one
//! block pair at a time and exposes `next_geq`, letting DAAT evaluation skip
//! whole blocks via the lexicon's `last[]` array before ever decompressing
//! them: skipping only advances `block_idx` and marks the block as
//! [`CursorState::BlockUnloaded`], so decompression happens at most once per
//! `next_geq` call, on the block it finally lands on.

use std::sync::Arc;

use crate::error::Result;
use crate::index::codec;
use crate::index::lexicon::LexiconEntry;
use crate::index::source::IndexSource;

/// Cursor lifecycle, named for clarity in tests and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    Unopened,
    /// `block_idx` names the block to read next, but it has not been read
    /// or decoded yet — set when a skip moves past a block without paying
    /// for its decompression.
    BlockUnloaded,
    BlockDecoded,
    Exhausted,
}

/// A position within a single term's postings list.
pub struct Cursor {
    entry: LexiconEntry,
    source: Arc<dyn IndexSource>,
    block_size: usize,
    state: CursorState,
    block_idx: usize,
    decoded_docs: Vec<u32>,
    decoded_freqs: Vec<u32>,
    pos_in_block: usize,
}

impl Cursor {
    pub fn open(entry: LexiconEntry, source: Arc<dyn IndexSource>, block_size: usize) -> Self {
        Self {
            entry,
            source,
            block_size,
            state: CursorState::Unopened,
            block_idx: 0,
            decoded_docs: Vec::new(),
            decoded_freqs: Vec::new(),
            pos_in_block: 0,
        }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn document_frequency(&self) -> u32 {
        self.entry.df
    }

    /// Highest doc-id across the whole list, used by DAAT to decide when a
    /// conjunctive sweep can short-circuit.
    pub fn last_did(&self) -> u32 {
        self.entry.last_did()
    }

    /// Moves `Unopened` to `BlockUnloaded` at block 0. Cheap: no I/O.
    fn ensure_open(&mut self) {
        if self.state == CursorState::Unopened {
            self.state = CursorState::BlockUnloaded;
        }
    }

    /// Decodes `self.block_idx` if it hasn't been decoded yet.
    fn ensure_decoded(&mut self) -> Result<()> {
        self.ensure_open();
        if self.state == CursorState::BlockUnloaded {
            self.load_block()?;
        }
        Ok(())
    }

    /// Reads and decodes the block pair at `self.block_idx`.
    fn load_block(&mut self) -> Result<()> {
        let block_idx = self.block_idx;
        let d_block_number = self.entry.start_d_block as u64 + (block_idx as u64) * 2;
        let f_block_number = d_block_number + 1;
        let is_first = block_idx == 0;
        let is_last = block_idx + 1 == self.entry.num_blocks as usize;

        let start_d = if is_first {
            self.entry.start_d_offset as usize
        } else {
            0
        };
        let end_d = if is_last {
            self.entry.last_d_offset as usize
        } else {
            self.block_size
        };
        let start_f = if is_first {
            self.entry.start_f_offset as usize
        } else {
            0
        };
        let end_f = if is_last {
            self.entry.last_f_offset as usize
        } else {
            self.block_size
        };

        let d_bytes = self
            .source
            .read_at(d_block_number * self.block_size as u64, self.block_size)?;
        let f_bytes = self
            .source
            .read_at(f_block_number * self.block_size as u64, self.block_size)?;

        // The block's highest doc-id bounds the decode: interior blocks can
        // have a few zero-padded trailing bytes left over from the
        // would-overflow flush trigger, and reading past the real postings
        // would decode that padding as a spurious doc-id 0.
        let block_max_doc = self.entry.last[block_idx];
        let mut docs = Vec::new();
        let mut cursor = start_d;
        while cursor < end_d {
            let (doc_id, used) = codec::decode(&d_bytes[cursor..])?;
            cursor += used;
            docs.push(doc_id);
            if doc_id >= block_max_doc {
                break;
            }
        }
        let mut freqs = Vec::new();
        let mut fcursor = start_f;
        while freqs.len() < docs.len() && fcursor < end_f {
            let (freq, used) = codec::decode(&f_bytes[fcursor..])?;
            fcursor += used;
            freqs.push(freq);
        }

        self.decoded_docs = docs;
        self.decoded_freqs = freqs;
        self.pos_in_block = 0;
        self.state = if self.decoded_docs.is_empty() {
            CursorState::Exhausted
        } else {
            CursorState::BlockDecoded
        };
        Ok(())
    }

    /// Current (doc_id, freq) without consuming it, if the list has not
    /// been fully drained.
    pub fn current(&mut self) -> Result<Option<(u32, u32)>> {
        self.ensure_decoded()?;
        if self.state == CursorState::Exhausted {
            return Ok(None);
        }
        if self.pos_in_block < self.decoded_docs.len() {
            Ok(Some((
                self.decoded_docs[self.pos_in_block],
                self.decoded_freqs[self.pos_in_block],
            )))
        } else {
            Ok(None)
        }
    }

    /// Advances past the current posting, loading the next block if the
    /// current one is drained.
    pub fn advance(&mut self) -> Result<()> {
        self.ensure_decoded()?;
        if self.state == CursorState::Exhausted {
            return Ok(());
        }
        self.pos_in_block += 1;
        if self.pos_in_block >= self.decoded_docs.len() {
            if self.block_idx + 1 < self.entry.num_blocks as usize {
                self.block_idx += 1;
                self.state = CursorState::BlockUnloaded;
                self.load_block()?;
            } else {
                self.state = CursorState::Exhausted;
            }
        }
        Ok(())
    }

    /// Advances to the first posting with doc-id `>= target`, skipping
    /// whole blocks whose max doc-id (`last[]`) is still below `target`
    /// without decompressing them. Only the block the skip finally lands on
    /// is decoded, and at most once.
    pub fn next_geq(&mut self, target: u32) -> Result<Option<(u32, u32)>> {
        self.ensure_open();
        if self.state == CursorState::Exhausted {
            return Ok(None);
        }
        while target > self.entry.last[self.block_idx]
            && self.block_idx + 1 < self.entry.num_blocks as usize
        {
            self.block_idx += 1;
            self.state = CursorState::BlockUnloaded;
        }
        loop {
            match self.current()? {
                Some((doc, freq)) if doc >= target => return Ok(Some((doc, freq))),
                Some(_) => self.advance()?,
                None => return Ok(None),
            }
        }
    }
}
