use std::collections::HashSet;

use evidb_core::traits::Facets;
use evidb_core::types::{DocPos, Document};
use evidb_core::{Error, Result};
use evidb_tfidf::{SparseVector, TfidfModel, VectorIndex};

/// A document paired with the vector row computed from it.
#[derive(Debug, Clone)]
pub struct IndexedDocument {
    pub doc: Document,
    pub vector: SparseVector,
}

impl Facets for IndexedDocument {
    fn approach(&self) -> Option<&str> { self.doc.approach() }
    fn evidence_type(&self) -> Option<&str> { self.doc.evidence_type() }
    fn domain(&self) -> Option<&str> { self.doc.domain() }
}

/// The document table and the vector index joined into one owned structure,
/// so a position always addresses the same document in both.
#[derive(Debug, Clone)]
pub struct IndexedCorpus {
    model: TfidfModel,
    entries: Vec<IndexedDocument>,
}

impl IndexedCorpus {
    /// Pair `documents[i]` with row `i` of `index`. Fails when the counts differ,
    /// when a row was computed for a different `doc_id`, or on duplicate ids.
    pub fn bind(documents: Vec<Document>, index: VectorIndex) -> Result<Self> {
        if documents.len() != index.len() {
            return Err(Error::IndexLoad(format!(
                "document table has {} rows but vector index has {}",
                documents.len(),
                index.len()
            )));
        }
        let mut seen = HashSet::with_capacity(documents.len());
        for doc in &documents {
            if !seen.insert(doc.doc_id.as_str()) {
                return Err(Error::IndexLoad(format!("duplicate doc_id '{}'", doc.doc_id)));
            }
        }
        let (model, rows) = index.into_parts();
        let mut entries = Vec::with_capacity(documents.len());
        for (pos, (doc, (row_id, vector))) in documents.into_iter().zip(rows).enumerate() {
            if doc.doc_id != row_id {
                return Err(Error::IndexLoad(format!(
                    "row {pos} misaligned: table has '{}', index has '{row_id}'",
                    doc.doc_id
                )));
            }
            entries.push(IndexedDocument { doc, vector });
        }
        Ok(Self { model, entries })
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn entries(&self) -> &[IndexedDocument] { &self.entries }

    pub fn get(&self, pos: DocPos) -> Option<&IndexedDocument> { self.entries.get(pos) }

    pub fn model(&self) -> &TfidfModel { &self.model }

    /// Cosine relevance of `query` for every document, in table order.
    pub fn score(&self, query: &str) -> Result<Vec<f32>> {
        self.model.score_rows(query, self.entries.iter().map(|e| &e.vector))
    }
}
