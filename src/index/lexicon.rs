//! Term metadata table: the lexicon.
//!
//! One [`LexiconEntry`] per indexed term, recording where its postings live
//! in the block-compressed file and its per-block doc-id skip array. The
//! on-disk format is the plain-text line-per-term layout from the source's
//! `fprintf`/`load_lexicon`: fixed fields in a fixed order, followed by a
//! variable-length `last[]` array whose length is `num_blocks`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use ahash::RandomState;

use crate::error::{Result, SearchError};

/// Metadata for a single term's postings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconEntry {
    /// Document frequency: number of documents containing the term.
    pub df: u32,
    pub start_d_block: u32,
    pub start_d_offset: u32,
    pub start_f_offset: u32,
    pub last_d_block: u32,
    pub last_d_offset: u32,
    pub last_f_offset: u32,
    /// Highest doc-id the term appears in at all: the max doc-id of the
    /// final block, stored directly rather than derived so the on-disk
    /// format matches the source's `LexiconEntry` field-for-field.
    pub last_did: u32,
    /// Number of doc-id blocks this term's postings span.
    pub num_blocks: u32,
    /// Highest doc-id stored in each doc-id block the term occupies, in
    /// block order. Used to skip whole blocks during `next_geq`.
    pub last: Vec<u32>,
}

impl LexiconEntry {
    pub fn last_did(&self) -> u32 {
        self.last_did
    }
}

/// term -> metadata table, keyed by an ahash map to match the hot-path
/// lookup pattern every query does against it.
#[derive(Debug, Default)]
pub struct Lexicon {
    entries: HashMap<String, LexiconEntry, RandomState>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self {
            entries: HashMap::default(),
        }
    }

    pub fn insert(&mut self, term: String, entry: LexiconEntry) {
        self.entries.insert(term, entry);
    }

    pub fn get(&self, term: &str) -> Option<&LexiconEntry> {
        self.entries.get(term)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the lexicon as one line per term:
    /// `term df start_d_block start_d_offset start_f_offset last_d_block
    /// last_d_offset last_f_offset last_did num_blocks last_0 last_1 ...
    /// last_{n-1}`
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut w = BufWriter::new(File::create(path)?);
        for (term, e) in &self.entries {
            write!(
                w,
                "{} {} {} {} {} {} {} {} {} {}",
                term,
                e.df,
                e.start_d_block,
                e.start_d_offset,
                e.start_f_offset,
                e.last_d_block,
                e.last_d_offset,
                e.last_f_offset,
                e.last_did,
                e.num_blocks,
            )?;
            for v in &e.last {
                write!(w, " {v}")?;
            }
            writeln!(w)?;
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut lexicon = Self::new();
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = parse_line(&line).map_err(|e| {
                SearchError::Format(format!("lexicon line {}: {e}", lineno + 1))
            })?;
            lexicon.insert(entry.0, entry.1);
        }
        Ok(lexicon)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &LexiconEntry)> {
        self.entries.iter()
    }
}

fn parse_line(line: &str) -> io::Result<(String, LexiconEntry)> {
    let mut fields = line.split_whitespace();
    let term = fields
        .next()
        .ok_or_else(|| invalid("missing term"))?
        .to_string();
    let mut next_u32 = |name: &'static str| -> io::Result<u32> {
        fields
            .next()
            .ok_or_else(|| invalid(name))?
            .parse::<u32>()
            .map_err(|_| invalid(name))
    };
    let df = next_u32("df")?;
    let start_d_block = next_u32("start_d_block")?;
    let start_d_offset = next_u32("start_d_offset")?;
    let start_f_offset = next_u32("start_f_offset")?;
    let last_d_block = next_u32("last_d_block")?;
    let last_d_offset = next_u32("last_d_offset")?;
    let last_f_offset = next_u32("last_f_offset")?;
    let last_did = next_u32("last_did")?;
    let num_blocks = next_u32("num_blocks")?;
    let last: Vec<u32> = fields
        .map(|s| s.parse::<u32>().map_err(|_| invalid("last[]")))
        .collect::<io::Result<_>>()?;
    if last.len() as u32 != num_blocks {
        return Err(invalid("last[] length does not match num_blocks"));
    }
    Ok((
        term,
        LexiconEntry {
            df,
            start_d_block,
            start_d_offset,
            start_f_offset,
            last_d_block,
            last_d_offset,
            last_f_offset,
            last_did,
            num_blocks,
            last,
        },
    ))
}

fn invalid(what: &'static str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, what)
}
