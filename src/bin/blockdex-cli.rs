//! Build/query driver for the block-compressed inverted index.
//!
//! `build` reads a sorted postings stream plus the words and doc-lengths
//! side files and writes the postings file and lexicon to an output
//! directory. `query` opens a built index and runs an interactive loop
//! reading `c <terms...>` (conjunctive), `d <terms...>` (disjunctive), or
//! `q` to quit — matching the source processor's `main()` loop.

use std::fs::{self, File};
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::info;

use blockdex::config::SearchConfig;
use blockdex::index::{DocTable, IndexBuilder, WordsFile};
use blockdex::query::{IndexHandle, Mode};

#[derive(Parser)]
#[command(name = "blockdex-cli", about = "Block-compressed inverted index CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a postings file and lexicon from a sorted `term doc_id freq`
    /// stream.
    Build {
        /// Sorted postings stream: one `term doc_id freq` triple per line.
        #[arg(long)]
        postings: PathBuf,
        /// `term df` side file.
        #[arg(long)]
        words: PathBuf,
        /// `doc_id length` side file, used to record `N`/`avg_doc_length`
        /// into the built index's metadata file.
        #[arg(long)]
        doc_lengths: PathBuf,
        /// Directory to write `postings.bin`, `lexicon.txt`, and
        /// `index.meta` into.
        #[arg(long)]
        out_dir: PathBuf,
        #[arg(long, default_value_t = blockdex::config::DEFAULT_BLOCK_SIZE)]
        block_size: usize,
    },
    /// Open a built index and answer queries interactively.
    Query {
        #[arg(long)]
        index_dir: PathBuf,
        /// `doc_id length` side file used for BM25 length normalization.
        #[arg(long)]
        doc_lengths: PathBuf,
        #[arg(long, default_value_t = 10)]
        top_k: usize,
    },
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> blockdex::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Build {
            postings,
            words,
            doc_lengths,
            out_dir,
            block_size,
        } => build(&postings, &words, &doc_lengths, &out_dir, block_size),
        Command::Query {
            index_dir,
            doc_lengths,
            top_k,
        } => query(&index_dir, &doc_lengths, top_k),
    }
}

fn build(
    postings_in: &Path,
    words_path: &Path,
    doc_lengths_path: &Path,
    out_dir: &Path,
    block_size: usize,
) -> blockdex::Result<()> {
    fs::create_dir_all(out_dir)?;
    let words = WordsFile::load(words_path)?;

    let postings_out = out_dir.join("postings.bin");
    let out_file = File::create(&postings_out)?;
    let mut builder = IndexBuilder::new(out_file, words, block_size);

    let reader = io::BufReader::new(File::open(postings_in)?);
    let mut lines_read = 0u64;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let term = fields.next().ok_or_else(|| malformed(lines_read))?;
        let doc_id: u32 = fields
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| malformed(lines_read))?;
        let freq: u32 = fields
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| malformed(lines_read))?;
        builder.add_posting(term, doc_id, freq)?;
        lines_read += 1;
    }

    let (lexicon, _file) = builder.finish()?;
    lexicon.save(out_dir.join("lexicon.txt"))?;

    let doc_table = DocTable::load(doc_lengths_path)?;
    let meta = blockdex::index::IndexMeta::from_doc_table(&doc_table);
    meta.save(out_dir.join("index.meta"))?;

    info!(
        "built index: {} terms, {lines_read} postings, {} docs, avg_doc_length={:.3}, {}",
        lexicon.len(),
        meta.doc_count,
        meta.avg_doc_length,
        postings_out.display()
    );
    Ok(())
}

fn malformed(lineno: u64) -> blockdex::SearchError {
    blockdex::SearchError::Format(format!("postings stream line {}: malformed", lineno + 1))
}

fn query(index_dir: &Path, doc_lengths: &Path, top_k: usize) -> blockdex::Result<()> {
    let meta_path = index_dir.join("index.meta");
    let avg_doc_length = if meta_path.exists() {
        blockdex::index::IndexMeta::load(&meta_path)?.avg_doc_length
    } else {
        DocTable::load(doc_lengths)?.average_length()
    };
    let config = SearchConfig {
        bm25: blockdex::config::BM25Config {
            avg_doc_length,
            ..SearchConfig::default().bm25
        },
        default_top_k: top_k,
        ..SearchConfig::default()
    };
    let handle = IndexHandle::open(
        index_dir.join("lexicon.txt"),
        doc_lengths,
        index_dir.join("postings.bin"),
        config,
    )?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.splitn(2, char::is_whitespace);
        let mode_char = parts.next().unwrap_or("");
        let rest = parts.next().unwrap_or("").trim();
        let mode = match mode_char {
            "q" => break,
            "c" => Mode::Conjunctive,
            "d" => Mode::Disjunctive,
            other => {
                writeln!(out, "unrecognized command '{other}', use c/d/q")?;
                continue;
            }
        };
        let results = handle.evaluate(rest, mode, top_k)?;
        for r in results {
            writeln!(out, "{} {:.6}", r.doc_id, r.score)?;
        }
    }
    Ok(())
}
