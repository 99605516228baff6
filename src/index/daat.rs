//! Document-at-a-time query evaluation.
//!
//! Both strategies walk a set of term cursors in lockstep, advancing by
//! doc-id rather than materializing full posting lists, mirroring
//! `c_DAAT`/`d_DAAT` from the source query processor.

use crate::config::BM25Config;
use crate::error::Result;
use crate::index::cursor::Cursor;
use crate::index::doctable::DocTable;
use crate::index::heap::{ScoredDoc, TopKHeap};
use crate::index::scorer::{idf, term_score};

/// Conjunctive (AND) evaluation: a document only scores if every cursor
/// reaches it. `cursors` should be ordered shortest-list-first (by
/// ascending document frequency) so the driving cursor generates the
/// fewest candidate doc-ids; correctness does not depend on the order, only
/// performance does.
pub fn conjunctive(
    cursors: &mut [Cursor],
    doc_table: &DocTable,
    bm25: &BM25Config,
    n_docs: u32,
    k: usize,
) -> Result<Vec<ScoredDoc>> {
    let mut heap = TopKHeap::new(k);
    if cursors.is_empty() {
        return Ok(heap.into_sorted_vec());
    }
    let idfs: Vec<f32> = cursors
        .iter()
        .map(|c| idf(n_docs, c.document_frequency()))
        .collect();

    let Some((mut candidate, _)) = cursors[0].current()? else {
        return Ok(heap.into_sorted_vec());
    };

    loop {
        let mut all_match = true;
        let mut frontier = candidate;
        for cursor in cursors[1..].iter_mut() {
            match cursor.next_geq(candidate)? {
                None => return Ok(heap.into_sorted_vec()),
                Some((doc, _)) if doc != candidate => {
                    all_match = false;
                    if doc > frontier {
                        frontier = doc;
                    }
                }
                Some(_) => {}
            }
        }

        if all_match {
            let mut score = 0.0f32;
            for (cursor, &idf_val) in cursors.iter_mut().zip(&idfs) {
                if let Some((doc, freq)) = cursor.current()? {
                    debug_assert_eq!(doc, candidate);
                    let len = doc_table.length_of(doc)?;
                    score += term_score(bm25, idf_val, freq, len);
                }
            }
            heap.push(candidate, score);
            cursors[0].advance()?;
            match cursors[0].current()? {
                Some((doc, _)) => candidate = doc,
                None => break,
            }
        } else {
            match cursors[0].next_geq(frontier)? {
                Some((doc, _)) => candidate = doc,
                None => break,
            }
        }
    }
    Ok(heap.into_sorted_vec())
}

/// Disjunctive (OR) evaluation: every document reached by any cursor
/// scores, summing contributions only from the cursors actually sitting on
/// the current minimum doc-id.
pub fn disjunctive(
    cursors: &mut [Cursor],
    doc_table: &DocTable,
    bm25: &BM25Config,
    n_docs: u32,
    k: usize,
) -> Result<Vec<ScoredDoc>> {
    let mut heap = TopKHeap::new(k);
    let idfs: Vec<f32> = cursors
        .iter()
        .map(|c| idf(n_docs, c.document_frequency()))
        .collect();

    loop {
        let mut min_doc: Option<u32> = None;
        for cursor in cursors.iter_mut() {
            if let Some((doc, _)) = cursor.current()? {
                if min_doc.map(|m| doc < m).unwrap_or(true) {
                    min_doc = Some(doc);
                }
            }
        }
        let Some(min_doc) = min_doc else {
            break;
        };

        let mut score = 0.0f32;
        for (cursor, &idf_val) in cursors.iter_mut().zip(&idfs) {
            if let Some((doc, freq)) = cursor.current()? {
                if doc == min_doc {
                    let len = doc_table.length_of(doc)?;
                    score += term_score(bm25, idf_val, freq, len);
                    cursor.advance()?;
                }
            }
        }
        heap.push(min_doc, score);
    }
    Ok(heap.into_sorted_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::block::BlockWriter;
    use crate::index::codec;
    use crate::index::lexicon::LexiconEntry;
    use crate::index::source::{FileIndexSource, IndexSource};
    use std::sync::Arc;

    const BLOCK_SIZE: usize = 4096;

    fn make_cursor(dir: &tempfile::TempDir, name: &str, postings: &[(u32, u32)]) -> Cursor {
        let path = dir.path().join(name);
        let file = std::fs::File::create(&path).unwrap();
        let mut w = BlockWriter::new(file, BLOCK_SIZE);
        let mut last_doc = 0u32;
        let mut last_per_block = Vec::new();
        for &(doc, freq) in postings {
            let (db, dl) = codec::encode(doc);
            let (fb, fl) = codec::encode(freq);
            if w.would_overflow(dl, fl) {
                last_per_block.push(last_doc);
                w.flush_pair().unwrap();
            }
            w.append_doc_bytes(&db[..dl]);
            w.append_freq_bytes(&fb[..fl]);
            last_doc = doc;
        }
        let last_d_offset = w.d_len() as u32;
        let last_f_offset = w.f_len() as u32;
        last_per_block.push(last_doc);
        w.finish().unwrap();

        let entry = LexiconEntry {
            df: postings.len() as u32,
            start_d_block: 0,
            start_d_offset: 0,
            start_f_offset: 0,
            last_d_block: (last_per_block.len() as u32 - 1) * 2,
            last_d_offset,
            last_f_offset,
            last_did: last_doc,
            num_blocks: last_per_block.len() as u32,
            last: last_per_block,
        };
        let source: Arc<dyn IndexSource> = Arc::new(FileIndexSource::open(&path).unwrap());
        Cursor::open(entry, source, BLOCK_SIZE)
    }

    #[test]
    fn conjunctive_returns_only_shared_doc_ids() {
        let dir = tempfile::tempdir().unwrap();
        let mut cursors = vec![
            make_cursor(&dir, "a.bin", &[(1, 1), (2, 1), (3, 1), (5, 1)]),
            make_cursor(&dir, "b.bin", &[(2, 2), (3, 1), (4, 1)]),
        ];
        let doc_table = DocTable::new(vec![5; 10]);
        let bm25 = BM25Config::default();
        let results = conjunctive(&mut cursors, &doc_table, &bm25, 10, 10).unwrap();
        let mut ids: Vec<u32> = results.iter().map(|r| r.doc_id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn disjunctive_returns_union_of_doc_ids() {
        let dir = tempfile::tempdir().unwrap();
        let mut cursors = vec![
            make_cursor(&dir, "a.bin", &[(1, 1), (3, 1)]),
            make_cursor(&dir, "b.bin", &[(2, 1), (3, 1)]),
        ];
        let doc_table = DocTable::new(vec![5; 10]);
        let bm25 = BM25Config::default();
        let results = disjunctive(&mut cursors, &doc_table, &bm25, 10, 10).unwrap();
        let mut ids: Vec<u32> = results.iter().map(|r| r.doc_id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn top_k_bounds_result_count() {
        let dir = tempfile::tempdir().unwrap();
        let mut cursors = vec![make_cursor(
            &dir,
            "a.bin",
            &[(1, 1), (2, 1), (3, 1), (4, 1), (5, 1)],
        )];
        let doc_table = DocTable::new(vec![5; 10]);
        let bm25 = BM25Config::default();
        let results = disjunctive(&mut cursors, &doc_table, &bm25, 10, 2).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn empty_intersection_yields_no_results() {
        let dir = tempfile::tempdir().unwrap();
        let mut cursors = vec![
            make_cursor(&dir, "a.bin", &[(1, 1)]),
            make_cursor(&dir, "b.bin", &[(2, 1)]),
        ];
        let doc_table = DocTable::new(vec![5; 10]);
        let bm25 = BM25Config::default();
        let results = conjunctive(&mut cursors, &doc_table, &bm25, 10, 10).unwrap();
        assert!(results.is_empty());
    }
}
