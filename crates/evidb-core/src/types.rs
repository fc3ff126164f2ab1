//! Domain types shared by the scorer, the filter layer and the engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub type DocId = String;

/// Position of a document in the corpus table (and in the vector matrix).
pub type DocPos = usize;

/// A passage of the fixed corpus.
///
/// - `doc_id`: unique identifier across the corpus
/// - `text`: indexable text (may be enriched with metadata)
/// - `raw_text`: verbatim excerpt used for display
/// - `approach`/`domain`/`evidence_type`: nullable facet labels used by filtering
/// - `source_*`/`paragraph_index`: provenance, display only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub doc_id: DocId,
    pub text: String,
    #[serde(default)]
    pub raw_text: String,
    #[serde(default)]
    pub approach: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub evidence_type: Option<String>,
    #[serde(default)]
    pub source_title: String,
    #[serde(default)]
    pub source_type: String,
    #[serde(default)]
    pub source_file: String,
    #[serde(default)]
    pub paragraph_index: usize,
}

impl Document {
    /// Text shown to a reader: the verbatim excerpt, or the indexed text when
    /// the table carries no separate excerpt.
    pub fn display_text(&self) -> &str {
        if self.raw_text.is_empty() { &self.text } else { &self.raw_text }
    }
}

/// Metadata constraints inferred from a query. Each component is optional;
/// an unset component never narrows the candidate set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    pub approach: Option<String>,
    pub evidence_type: Option<String>,
    pub domain: Option<BTreeSet<String>>,
}

impl FilterSet {
    pub fn is_empty(&self) -> bool {
        self.approach.is_none() && self.evidence_type.is_none() && self.domain.is_none()
    }

    /// The same filter set with everything except `approach` dropped.
    pub fn approach_only(&self) -> Self {
        Self { approach: self.approach.clone(), evidence_type: None, domain: None }
    }
}

impl fmt::Display for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let approach = self.approach.as_deref().unwrap_or("none");
        let evidence = self.evidence_type.as_deref().unwrap_or("none");
        write!(f, "approach={approach}, evidence_type={evidence}, domain=")?;
        match &self.domain {
            Some(labels) => {
                let joined: Vec<&str> = labels.iter().map(String::as_str).collect();
                write!(f, "[{}]", joined.join(", "))
            }
            None => write!(f, "none"),
        }
    }
}

/// One ranked passage returned by a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub score: f32,
    pub doc_id: DocId,
    pub text: String,
    pub raw_text: String,
    pub approach: Option<String>,
    pub domain: Option<String>,
    pub evidence_type: Option<String>,
    pub source_title: String,
    pub source_type: String,
    pub paragraph_index: usize,
}

impl ResultRecord {
    pub fn from_document(doc: &Document, score: f32) -> Self {
        Self {
            score,
            doc_id: doc.doc_id.clone(),
            text: doc.text.clone(),
            raw_text: doc.raw_text.clone(),
            approach: doc.approach.clone(),
            domain: doc.domain.clone(),
            evidence_type: doc.evidence_type.clone(),
            source_title: doc.source_title.clone(),
            source_type: doc.source_type.clone(),
            paragraph_index: doc.paragraph_index,
        }
    }
}
