//! evidb-tfidf
//!
//! The frozen vector model: TF-IDF weighting over normalized text, the per-document
//! vectors it produced, and cosine relevance scoring. `builder` fits the model
//! offline; the search path only transforms queries and scores.
pub mod builder;
pub mod index;
pub mod sparse;
pub mod stopwords;
pub mod vectorizer;

pub use builder::{build_index, TfidfBuilder, TfidfParams};
pub use index::VectorIndex;
pub use sparse::{cosine_scores, SparseVector};
pub use vectorizer::TfidfModel;
