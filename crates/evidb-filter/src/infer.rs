use std::collections::BTreeSet;

use tracing::debug;

use evidb_core::config::Config;
use evidb_core::types::FilterSet;

use crate::tables::KeywordTables;

/// Maps query text to metadata constraints using [`KeywordTables`].
pub struct FilterInferencer {
    tables: KeywordTables,
}

impl Default for FilterInferencer {
    fn default() -> Self { Self::new(KeywordTables::default()) }
}

impl FilterInferencer {
    pub fn new(tables: KeywordTables) -> Self { Self { tables: tables.prepared() } }

    /// Built-in tables unless the configuration carries a `filters` table.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        if config.has("filters") {
            let tables: KeywordTables = config.get("filters")?;
            debug!(version = tables.version, groups = tables.domain_groups.len(), "using configured keyword tables");
            return Ok(Self::new(tables));
        }
        Ok(Self::default())
    }

    pub fn tables(&self) -> &KeywordTables { &self.tables }

    pub fn infer(&self, query: &str) -> FilterSet {
        let q = query.to_lowercase();
        let filters = FilterSet {
            approach: self.infer_approach(&q),
            evidence_type: self.infer_evidence(&q),
            domain: self.infer_domain(&q),
        };
        debug!(query, %filters, "inferred filters");
        filters
    }

    fn infer_approach(&self, q: &str) -> Option<String> {
        let fired: Vec<&str> = self
            .tables
            .approaches
            .iter()
            .filter(|m| contains_any(q, &m.triggers))
            .map(|m| m.label.as_str())
            .collect();
        match fired.as_slice() {
            [] => None,
            [label] => Some((*label).to_string()),
            many => {
                debug!(labels = ?many, "conflicting approach signals; leaving approach unset");
                None
            }
        }
    }

    fn infer_evidence(&self, q: &str) -> Option<String> {
        if contains_any(q, &self.tables.materials) {
            Some(self.tables.material_label.clone())
        } else if contains_any(q, &self.tables.study_markers) {
            Some(self.tables.study_label.clone())
        } else {
            None
        }
    }

    fn infer_domain(&self, q: &str) -> Option<BTreeSet<String>> {
        let labels: BTreeSet<String> = self
            .tables
            .domain_groups
            .iter()
            .filter(|g| contains_any(q, &g.triggers))
            .flat_map(|g| g.implies.iter().cloned())
            .collect();
        if labels.is_empty() { None } else { Some(labels) }
    }
}

fn contains_any(q: &str, triggers: &[String]) -> bool {
    triggers.iter().any(|t| q.contains(t.as_str()))
}
