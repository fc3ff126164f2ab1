use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use evidb_core::types::DocId;
use evidb_core::{Error, Result};

use crate::sparse::SparseVector;
use crate::vectorizer::TfidfModel;

pub const INDEX_FORMAT_VERSION: u32 = 1;

/// Fitted model plus one vector per document. `doc_ids[i]` names the document
/// `rows[i]` was computed from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    version: u32,
    model: TfidfModel,
    doc_ids: Vec<DocId>,
    rows: Vec<SparseVector>,
}

impl VectorIndex {
    pub fn from_parts(model: TfidfModel, doc_ids: Vec<DocId>, rows: Vec<SparseVector>) -> Result<Self> {
        let index = Self { version: INDEX_FORMAT_VERSION, model, doc_ids, rows };
        index.validate()?;
        Ok(index)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::IndexLoad(format!("cannot read vector index {}: {e}", path.display())))?;
        let index: Self = serde_json::from_str(&content)
            .map_err(|e| Error::IndexLoad(format!("malformed vector index {}: {e}", path.display())))?;
        index.validate()?;
        info!(path = %path.display(), rows = index.len(), vocab = index.model.vocab_size(), "loaded vector index");
        Ok(index)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::Operation(format!("cannot create {}: {e}", parent.display())))?;
        }
        let json = serde_json::to_string(self).map_err(|e| Error::Operation(format!("cannot serialize index: {e}")))?;
        fs::write(path, json).map_err(|e| Error::Operation(format!("cannot write {}: {e}", path.display())))?;
        info!(path = %path.display(), rows = self.len(), "saved vector index");
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.version != INDEX_FORMAT_VERSION {
            return Err(Error::IndexLoad(format!("unsupported index format version {} (expected {INDEX_FORMAT_VERSION})", self.version)));
        }
        if self.doc_ids.len() != self.rows.len() {
            return Err(Error::IndexLoad(format!("{} doc ids for {} vector rows", self.doc_ids.len(), self.rows.len())));
        }
        if !self.model.is_consistent() {
            return Err(Error::IndexLoad("vocabulary and idf table disagree".to_string()));
        }
        let vocab = self.model.vocab_size();
        for (pos, row) in self.rows.iter().enumerate() {
            let entries = row.entries();
            if entries.iter().any(|&(t, _)| t as usize >= vocab) {
                return Err(Error::IndexLoad(format!("row {pos} references a term outside the vocabulary")));
            }
            if entries.windows(2).any(|w| w[0].0 >= w[1].0) {
                return Err(Error::IndexLoad(format!("row {pos} term ids are not strictly increasing")));
            }
            if entries.iter().any(|&(_, w)| !w.is_finite()) {
                return Err(Error::IndexLoad(format!("row {pos} has a non-finite weight")));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize { self.rows.len() }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    pub fn model(&self) -> &TfidfModel { &self.model }

    pub fn doc_ids(&self) -> &[DocId] { &self.doc_ids }

    /// Cosine score of `query` against every document, in row order.
    pub fn score(&self, query: &str) -> Result<Vec<f32>> {
        self.model.score_rows(query, &self.rows)
    }

    /// Split into the model and `(doc_id, row)` pairs for binding to a table.
    pub fn into_parts(self) -> (TfidfModel, Vec<(DocId, SparseVector)>) {
        (self.model, self.doc_ids.into_iter().zip(self.rows).collect())
    }
}
