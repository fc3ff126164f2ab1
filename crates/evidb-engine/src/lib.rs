//! evidb-engine
//!
//! Filtered retrieval over a bound corpus: score every passage, infer and
//! confirm metadata filters, narrow with fallback, then rank the survivors.
pub mod bound;
pub mod engine;
pub mod rank;

pub use bound::{IndexedCorpus, IndexedDocument};
pub use engine::{FilteredSearchEngine, SearchOutcome};
pub use rank::{rank, top_k, Ranked};
