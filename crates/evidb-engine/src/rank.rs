use evidb_core::types::{DocPos, ResultRecord};

use crate::bound::IndexedCorpus;

/// The `k` best candidates by descending score. Ties keep ascending position
/// order so identical inputs always rank identically. Candidates without a
/// score are skipped.
pub fn top_k(candidates: &[DocPos], scores: &[f32], k: usize) -> Vec<(DocPos, f32)> {
    let mut scored: Vec<(DocPos, f32)> =
        candidates.iter().filter_map(|&pos| scores.get(pos).map(|&s| (pos, s))).collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    scored.truncate(k);
    scored
}

/// Rank `candidates` and assemble result records lazily from `corpus`.
pub fn rank<'a>(corpus: &'a IndexedCorpus, candidates: &[DocPos], scores: &[f32], k: usize) -> Ranked<'a> {
    Ranked { corpus, order: top_k(candidates, scores, k).into_iter() }
}

/// Ranked results of one search, consumed once.
pub struct Ranked<'a> {
    corpus: &'a IndexedCorpus,
    order: std::vec::IntoIter<(DocPos, f32)>,
}

impl Iterator for Ranked<'_> {
    type Item = ResultRecord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (pos, score) = self.order.next()?;
            if let Some(entry) = self.corpus.get(pos) {
                return Some(ResultRecord::from_document(&entry.doc, score));
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.order.len()))
    }
}
