use std::collections::{BTreeMap, HashMap, HashSet};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::info;

use evidb_core::config::IndexSettings;
use evidb_core::types::Document;
use evidb_core::{Error, Result};

use crate::index::VectorIndex;
use crate::sparse::{SparseVector, TermId};
use crate::vectorizer::{analyze, TfidfModel};

/// Fit parameters. `min_df` is an absolute document count, `max_df` a
/// fraction of the corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfParams {
    pub min_df: usize,
    pub max_df: f32,
    pub ngram_max: usize,
    pub stop_words: bool,
}

impl Default for TfidfParams {
    fn default() -> Self { Self::from(&IndexSettings::default()) }
}

impl From<&IndexSettings> for TfidfParams {
    fn from(s: &IndexSettings) -> Self {
        Self { min_df: s.min_df, max_df: s.max_df, ngram_max: s.ngram_max, stop_words: s.stop_words }
    }
}

#[derive(Default)]
pub struct TfidfBuilder {
    params: TfidfParams,
    progress: bool,
}

impl TfidfBuilder {
    pub fn new(params: TfidfParams) -> Self { Self { params, progress: false } }

    /// Show a progress bar while documents are vectorized.
    pub fn with_progress(mut self, progress: bool) -> Self { self.progress = progress; self }

    /// Fit the vocabulary and idf weights on `texts` and return the model with
    /// one L2-normalized vector per input text, in input order.
    pub fn fit<S: AsRef<str>>(&self, texts: &[S]) -> Result<(TfidfModel, Vec<SparseVector>)> {
        let p = &self.params;
        if p.ngram_max == 0 { return Err(Error::InvalidConfig("ngram_max must be >= 1".to_string())); }
        if texts.is_empty() { return Err(Error::Operation("cannot fit a model on an empty corpus".to_string())); }

        let analyzed: Vec<Vec<String>> = texts.iter().map(|t| analyze(t.as_ref(), p.ngram_max, p.stop_words)).collect();

        let mut df: HashMap<&str, usize> = HashMap::new();
        for terms in &analyzed {
            let unique: HashSet<&str> = terms.iter().map(String::as_str).collect();
            for term in unique { *df.entry(term).or_insert(0) += 1; }
        }

        #[allow(clippy::cast_precision_loss)]
        let n = texts.len() as f32;
        let max_count = p.max_df * n;
        // Sorted so term ids are stable for a given corpus.
        let kept: BTreeMap<&str, usize> = df
            .into_iter()
            .filter(|&(_, count)| count >= p.min_df && (count as f32) <= max_count)
            .collect();
        if kept.is_empty() {
            return Err(Error::Operation(format!(
                "empty vocabulary after pruning (min_df={}, max_df={}); corpus too small or too uniform",
                p.min_df, p.max_df
            )));
        }

        let mut vocabulary = HashMap::with_capacity(kept.len());
        let mut idf = Vec::with_capacity(kept.len());
        for (id, (term, count)) in kept.into_iter().enumerate() {
            let id = TermId::try_from(id).map_err(|_| Error::Operation("vocabulary exceeds u32 term ids".to_string()))?;
            vocabulary.insert(term.to_string(), id);
            idf.push(((1.0 + n) / (1.0 + count as f32)).ln() + 1.0);
        }
        let model = TfidfModel { vocabulary, idf, ngram_max: p.ngram_max, stop_words: p.stop_words };

        let pb = if self.progress { ProgressBar::new(texts.len() as u64) } else { ProgressBar::hidden() };
        if let Ok(style) = ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents ({percent}%)") {
            pb.set_style(style.progress_chars("#>-"));
        }
        let mut rows = Vec::with_capacity(analyzed.len());
        for terms in &analyzed {
            let mut counts: HashMap<TermId, f32> = HashMap::new();
            for term in terms {
                if let Some(id) = model.term_id(term) { *counts.entry(id).or_insert(0.0) += 1.0; }
            }
            let weighted = counts.into_iter().map(|(id, tf)| (id, tf * model.idf[id as usize])).collect();
            rows.push(SparseVector::from_unsorted(weighted).l2_normalized());
            pb.inc(1);
        }
        pb.finish_and_clear();

        info!(documents = rows.len(), vocab = model.vocab_size(), "fitted tf-idf model");
        Ok((model, rows))
    }
}

/// Fit on each document's `text` and bind the vectors to the documents' ids.
pub fn build_index(docs: &[Document], builder: &TfidfBuilder) -> Result<VectorIndex> {
    let texts: Vec<&str> = docs.iter().map(|d| d.text.as_str()).collect();
    let (model, rows) = builder.fit(&texts)?;
    let doc_ids = docs.iter().map(|d| d.doc_id.clone()).collect();
    VectorIndex::from_parts(model, doc_ids, rows)
}
