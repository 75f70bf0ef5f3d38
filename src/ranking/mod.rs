//! Deterministic ranking of classifier output.
//!
//! The ranker is the first stage of every classification: it checks the
//! raw probability vector against the length and value contract and
//! orders all classes by confidence. Equal confidences are broken by
//! ascending class id so that the ordering is total and reproducible.

mod engine;
mod types;

pub use engine::{validate_ranking, Ranker};
pub use types::RankedEntry;
