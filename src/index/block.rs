//! Physical block buffering for the postings file.
//!
//! Postings are written as alternating doc-id/frequency block pairs, each
//! block a fixed, zero-padded physical size. [`BlockWriter`] owns the two
//! in-flight buffers and flushes a pair to the underlying writer whenever the
//! next varbyte-encoded value would overflow the current block, mirroring
//! the source's pad-then-flush behavior in `insert_posting`/`pipe_to_file`.
//!
//! Block-boundary bookkeeping (which block a term's postings start/end in,
//! the per-block `last[]` skip array) is the builder's responsibility, not
//! this module's: `BlockWriter` only knows about bytes and padding.

use std::io::{self, Write};

/// Buffers and flushes paired doc-id/frequency blocks of a fixed physical
/// size to an underlying writer.
pub struct BlockWriter<W: Write> {
    out: W,
    block_size: usize,
    d_buf: Vec<u8>,
    f_buf: Vec<u8>,
    /// Index of the next block pair's doc-id block. Incremented by 2 on
    /// every flush, so doc-id blocks are always even-numbered and frequency
    /// blocks odd-numbered, as in the source layout.
    block_index: usize,
}

impl<W: Write> BlockWriter<W> {
    pub fn new(out: W, block_size: usize) -> Self {
        Self {
            out,
            block_size,
            d_buf: Vec::with_capacity(block_size),
            f_buf: Vec::with_capacity(block_size),
            block_index: 0,
        }
    }

    /// Whether appending `extra_d_bytes`/`extra_f_bytes` to the doc-id and
    /// frequency buffers respectively would overflow either one. Checking
    /// both, rather than assuming they grow in lockstep, matters because a
    /// varbyte-encoded doc-id and its paired frequency rarely take the same
    /// number of bytes.
    pub fn would_overflow(&self, extra_d_bytes: usize, extra_f_bytes: usize) -> bool {
        self.d_buf.len() + extra_d_bytes > self.block_size
            || self.f_buf.len() + extra_f_bytes > self.block_size
    }

    pub fn append_doc_bytes(&mut self, bytes: &[u8]) {
        self.d_buf.extend_from_slice(bytes);
    }

    pub fn append_freq_bytes(&mut self, bytes: &[u8]) {
        self.f_buf.extend_from_slice(bytes);
    }

    pub fn d_len(&self) -> usize {
        self.d_buf.len()
    }

    pub fn f_len(&self) -> usize {
        self.f_buf.len()
    }

    /// Index of the doc-id block currently being filled.
    pub fn block_index(&self) -> usize {
        self.block_index
    }

    /// Byte offset within the eventual doc-id block where the next append
    /// will land.
    pub fn d_offset(&self) -> usize {
        self.d_buf.len()
    }

    /// Byte offset within the eventual frequency block where the next
    /// append will land.
    pub fn f_offset(&self) -> usize {
        self.f_buf.len()
    }

    /// Pads both buffers to `block_size` with zero bytes, writes the doc-id
    /// block followed by the frequency block, and resets both buffers for
    /// the next pair.
    pub fn flush_pair(&mut self) -> io::Result<()> {
        self.d_buf.resize(self.block_size, 0);
        self.f_buf.resize(self.block_size, 0);
        self.out.write_all(&self.d_buf)?;
        self.out.write_all(&self.f_buf)?;
        self.d_buf.clear();
        self.f_buf.clear();
        self.block_index += 2;
        Ok(())
    }

    /// Flushes any partially filled final pair (padded like any other
    /// block) and returns the inner writer. A no-op flush if nothing is
    /// pending, matching the source leaving a fully-flushed final block
    /// untouched.
    pub fn finish(mut self) -> io::Result<W> {
        if !self.d_buf.is_empty() || !self.f_buf.is_empty() {
            self.flush_pair()?;
        }
        Ok(self.out)
    }
}
