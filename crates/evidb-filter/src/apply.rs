use std::collections::HashSet;

use tracing::{debug, warn};

use evidb_core::traits::{ConfirmFilters, Facets};
use evidb_core::types::{DocPos, FilterSet};

/// Which constraints shaped the final candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterTier {
    /// Nothing was inferred.
    Unfiltered,
    /// Filters were inferred but the confirmation gate rejected them.
    Declined,
    /// Every inferred constraint was applied.
    Full,
    /// The full set under-populated; only the approach constraint was kept.
    ApproachOnly,
    /// The full set under-populated and there was no approach to keep.
    Relaxed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet {
    pub positions: Vec<DocPos>,
    pub tier: FilterTier,
}

impl CandidateSet {
    pub fn len(&self) -> usize { self.positions.len() }
    pub fn is_empty(&self) -> bool { self.positions.is_empty() }
}

/// Narrows document positions by inferred filters behind a confirmation gate,
/// relaxing to approach-only when the result would hold fewer than `k` documents.
pub struct FilterApplier {
    confirm: Box<dyn ConfirmFilters>,
}

impl FilterApplier {
    pub fn new(confirm: Box<dyn ConfirmFilters>) -> Self { Self { confirm } }

    pub fn apply<D: Facets>(&self, docs: &[D], filters: &FilterSet, k: usize) -> anyhow::Result<CandidateSet> {
        let all = || (0..docs.len()).collect::<Vec<_>>();
        if filters.is_empty() {
            return Ok(CandidateSet { positions: all(), tier: FilterTier::Unfiltered });
        }
        if !self.confirm.confirm(filters)? {
            debug!(%filters, "filters declined");
            return Ok(CandidateSet { positions: all(), tier: FilterTier::Declined });
        }

        let narrowed = narrow(docs, filters);
        if narrowed.len() >= k {
            debug!(%filters, candidates = narrowed.len(), "filters applied");
            return Ok(CandidateSet { positions: narrowed, tier: FilterTier::Full });
        }

        let fallback = filters.approach_only();
        let (positions, tier) = if fallback.is_empty() {
            (all(), FilterTier::Relaxed)
        } else {
            (narrow(docs, &fallback), FilterTier::ApproachOnly)
        };
        warn!(
            %filters,
            matched = narrowed.len(),
            k,
            tier = ?tier,
            candidates = positions.len(),
            "filters over-constrain the corpus; relaxing to approach only"
        );
        Ok(CandidateSet { positions, tier })
    }
}

/// Positions whose facets match every set component of `filters`
/// (case-insensitive; the domain label must be one of the inferred labels).
pub fn narrow<D: Facets>(docs: &[D], filters: &FilterSet) -> Vec<DocPos> {
    let approach = filters.approach.as_deref().map(str::to_lowercase);
    let evidence = filters.evidence_type.as_deref().map(str::to_lowercase);
    let domains: Option<HashSet<String>> =
        filters.domain.as_ref().map(|labels| labels.iter().map(|l| l.to_lowercase()).collect());

    docs.iter()
        .enumerate()
        .filter(|(_, d)| approach.as_deref().map_or(true, |a| label_eq(d.approach(), a)))
        .filter(|(_, d)| evidence.as_deref().map_or(true, |e| label_eq(d.evidence_type(), e)))
        .filter(|(_, d)| {
            domains.as_ref().map_or(true, |set| d.domain().is_some_and(|v| set.contains(&v.to_lowercase())))
        })
        .map(|(pos, _)| pos)
        .collect()
}

fn label_eq(value: Option<&str>, wanted: &str) -> bool {
    value.is_some_and(|v| v.to_lowercase() == wanted)
}
