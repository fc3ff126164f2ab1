use std::path::Path;

use tracing::{debug, info};

use evidb_core::config::Config;
use evidb_core::corpus::load_documents;
use evidb_core::traits::{ConfirmFilters, SearchEngine};
use evidb_core::types::{Document, FilterSet, ResultRecord};
use evidb_core::{Error, Result};
use evidb_filter::{FilterApplier, FilterInferencer, FilterTier};
use evidb_tfidf::VectorIndex;

use crate::bound::IndexedCorpus;
use crate::rank::{rank, Ranked};

/// What a filtered search decided, alongside its results.
pub struct SearchOutcome<'a> {
    pub filters: FilterSet,
    pub tier: FilterTier,
    /// Size of the candidate set the results were ranked from.
    pub candidates: usize,
    pub results: Ranked<'a>,
}

pub struct FilteredSearchEngine {
    corpus: IndexedCorpus,
    inferencer: FilterInferencer,
    applier: FilterApplier,
}

impl FilteredSearchEngine {
    pub fn new(documents: Vec<Document>, index: VectorIndex, confirm: Box<dyn ConfirmFilters>) -> Result<Self> {
        let corpus = IndexedCorpus::bind(documents, index)?;
        info!(documents = corpus.len(), vocab = corpus.model().vocab_size(), "search engine ready");
        Ok(Self { corpus, inferencer: FilterInferencer::default(), applier: FilterApplier::new(confirm) })
    }

    pub fn from_paths(corpus_path: &Path, index_path: &Path, confirm: Box<dyn ConfirmFilters>) -> Result<Self> {
        let documents = load_documents(corpus_path)?;
        let index = VectorIndex::load(index_path)?;
        Self::new(documents, index, confirm)
    }

    /// Load the artifacts named in `config` and use its keyword tables, if any.
    pub fn from_config(config: &Config, confirm: Box<dyn ConfirmFilters>) -> anyhow::Result<Self> {
        let settings = config.settings()?;
        let engine = Self::from_paths(&settings.data.corpus_file(), &settings.data.index_file(), confirm)?;
        Ok(engine.with_inferencer(FilterInferencer::from_config(config)?))
    }

    #[must_use]
    pub fn with_inferencer(mut self, inferencer: FilterInferencer) -> Self {
        self.inferencer = inferencer;
        self
    }

    pub fn corpus(&self) -> &IndexedCorpus { &self.corpus }

    pub fn search(&self, query: &str, k: usize) -> Result<Ranked<'_>> {
        Ok(self.search_with_report(query, k)?.results)
    }

    pub fn search_with_report(&self, query: &str, k: usize) -> Result<SearchOutcome<'_>> {
        validate(query, k)?;
        let scores = self.corpus.score(query)?;
        let filters = self.inferencer.infer(query);
        let candidates = self
            .applier
            .apply(self.corpus.entries(), &filters, k)
            .map_err(|e| Error::Operation(format!("filter confirmation failed: {e:#}")))?;
        debug!(tier = ?candidates.tier, candidates = candidates.len(), k, "ranking candidates");
        let results = rank(&self.corpus, &candidates.positions, &scores, k);
        Ok(SearchOutcome { filters, tier: candidates.tier, candidates: candidates.len(), results })
    }

    /// Rank over the whole corpus without inferring any filters.
    pub fn search_unfiltered(&self, query: &str, k: usize) -> Result<Ranked<'_>> {
        validate(query, k)?;
        let scores = self.corpus.score(query)?;
        let all: Vec<usize> = (0..self.corpus.len()).collect();
        Ok(rank(&self.corpus, &all, &scores, k))
    }
}

fn validate(query: &str, k: usize) -> Result<()> {
    if query.trim().is_empty() {
        return Err(Error::InvalidQuery("query is empty".to_string()));
    }
    if k == 0 {
        return Err(Error::InvalidQuery("k must be at least 1".to_string()));
    }
    Ok(())
}

impl SearchEngine for FilteredSearchEngine {
    fn query(&self, query: &str, k: usize) -> anyhow::Result<Vec<ResultRecord>> {
        Ok(self.search(query, k)?.collect())
    }
}
