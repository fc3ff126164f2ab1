use serde::{Deserialize, Serialize};

pub type TermId = u32;

/// Sparse term-weight vector; entries are sorted by term id with no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SparseVector {
    entries: Vec<(TermId, f32)>,
}

impl SparseVector {
    /// Build from unordered `(term, weight)` pairs, summing duplicates and
    /// dropping zero weights.
    pub fn from_unsorted(mut entries: Vec<(TermId, f32)>) -> Self {
        entries.sort_by_key(|&(term, _)| term);
        let mut merged: Vec<(TermId, f32)> = Vec::with_capacity(entries.len());
        for (term, weight) in entries {
            match merged.last_mut() {
                Some(last) if last.0 == term => last.1 += weight,
                _ => merged.push((term, weight)),
            }
        }
        merged.retain(|&(_, w)| w != 0.0);
        Self { entries: merged }
    }

    pub fn entries(&self) -> &[(TermId, f32)] { &self.entries }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn norm(&self) -> f32 {
        self.entries.iter().map(|&(_, w)| w * w).sum::<f32>().sqrt()
    }

    /// Scale to unit L2 norm; the zero vector stays zero.
    pub fn l2_normalized(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 {
            for entry in &mut self.entries { entry.1 /= norm; }
        }
        self
    }

    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j, mut acc) = (0usize, 0usize, 0f32);
        let (a, b) = (&self.entries, &other.entries);
        while i < a.len() && j < b.len() {
            match a[i].0.cmp(&b[j].0) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => { acc += a[i].1 * b[j].1; i += 1; j += 1; }
            }
        }
        acc
    }

    /// Cosine similarity; 0.0 when either side is the zero vector.
    pub fn cosine(&self, other: &SparseVector) -> f32 {
        let denom = self.norm() * other.norm();
        if denom == 0.0 { return 0.0; }
        (self.dot(other) / denom).clamp(0.0, 1.0)
    }
}

/// Score `query` against every row, preserving row order.
pub fn cosine_scores<'a, I>(query: &SparseVector, rows: I) -> Vec<f32>
where
    I: IntoIterator<Item = &'a SparseVector>,
{
    rows.into_iter().map(|row| query.cosine(row)).collect()
}
