use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use evidb_core::text::normalize;
use evidb_core::{Error, Result};

use crate::sparse::{cosine_scores, SparseVector, TermId};
use crate::stopwords::is_stop_word;

/// A fitted TF-IDF weighting: vocabulary, smoothed idf per term and the
/// analyzer settings the vocabulary was built with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfModel {
    pub(crate) vocabulary: HashMap<String, TermId>,
    pub(crate) idf: Vec<f32>,
    pub(crate) ngram_max: usize,
    pub(crate) stop_words: bool,
}

impl TfidfModel {
    pub fn vocab_size(&self) -> usize { self.idf.len() }

    pub fn term_id(&self, term: &str) -> Option<TermId> { self.vocabulary.get(term).copied() }

    pub fn idf(&self, term: &str) -> Option<f32> {
        self.term_id(term).and_then(|id| self.idf.get(id as usize).copied())
    }

    /// Normalize `text` and split it into the terms the model counts:
    /// tokens of two or more characters, stop words removed, then all
    /// n-grams from 1 up to `ngram_max`.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        analyze(text, self.ngram_max, self.stop_words)
    }

    /// Vectorize `text` with the frozen vocabulary. Unknown terms are ignored.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: HashMap<TermId, f32> = HashMap::new();
        for term in self.analyze(text) {
            if let Some(id) = self.term_id(&term) {
                *counts.entry(id).or_insert(0.0) += 1.0;
            }
        }
        let weighted = counts
            .into_iter()
            .map(|(id, tf)| (id, tf * self.idf.get(id as usize).copied().unwrap_or(0.0)))
            .collect();
        SparseVector::from_unsorted(weighted).l2_normalized()
    }

    /// Cosine score of `query` against each row, in row order. An empty row
    /// set means no index was built.
    pub fn score_rows<'a, I>(&self, query: &str, rows: I) -> Result<Vec<f32>>
    where
        I: IntoIterator<Item = &'a SparseVector>,
        I::IntoIter: ExactSizeIterator,
    {
        let rows = rows.into_iter();
        let count = rows.len();
        if count == 0 { return Err(Error::UninitializedIndex); }
        let q = self.transform(query);
        Ok(cosine_scores(&q, rows))
    }

    /// The vocabulary id space must be dense and match the idf table.
    pub(crate) fn is_consistent(&self) -> bool {
        self.ngram_max >= 1
            && self.vocabulary.len() == self.idf.len()
            && self.vocabulary.values().all(|&id| (id as usize) < self.idf.len())
    }
}

pub(crate) fn analyze(text: &str, ngram_max: usize, stop_words: bool) -> Vec<String> {
    let normalized = normalize(text);
    let tokens: Vec<&str> = normalized
        .split(' ')
        .filter(|t| t.len() >= 2)
        .filter(|t| !(stop_words && is_stop_word(t)))
        .collect();
    let mut terms = Vec::with_capacity(tokens.len() * ngram_max.max(1));
    for n in 1..=ngram_max.max(1) {
        if n > tokens.len() { break; }
        for window in tokens.windows(n) {
            terms.push(window.join(" "));
        }
    }
    terms
}
