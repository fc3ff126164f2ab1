use crate::types::{Document, FilterSet, ResultRecord};

/// Read access to the facet labels the filter layer matches on.
pub trait Facets {
    fn approach(&self) -> Option<&str>;
    fn evidence_type(&self) -> Option<&str>;
    fn domain(&self) -> Option<&str>;
}

impl Facets for Document {
    fn approach(&self) -> Option<&str> { self.approach.as_deref() }
    fn evidence_type(&self) -> Option<&str> { self.evidence_type.as_deref() }
    fn domain(&self) -> Option<&str> { self.domain.as_deref() }
}

/// Operator gate consulted before inferred filters narrow the candidates.
pub trait ConfirmFilters: Send + Sync {
    fn confirm(&self, filters: &FilterSet) -> anyhow::Result<bool>;
}

pub trait SearchEngine: Send + Sync {
    fn query(&self, query: &str, k: usize) -> anyhow::Result<Vec<ResultRecord>>;
}
