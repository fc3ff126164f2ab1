//! evidb-filter
//!
//! Query-driven metadata filtering: keyword tables, inference of a
//! [`FilterSet`](evidb_core::types::FilterSet) from query text, the operator
//! confirmation gate, and candidate narrowing with its fallback policy.
pub mod apply;
pub mod confirm;
pub mod infer;
pub mod tables;

pub use apply::{narrow, CandidateSet, FilterApplier, FilterTier};
pub use confirm::{confirmer_for, AlwaysApply, NeverApply, PromptConfirm, TerminalConfirm};
pub use infer::FilterInferencer;
pub use tables::{ApproachMarker, DomainGroup, KeywordTables, TABLE_VERSION};
