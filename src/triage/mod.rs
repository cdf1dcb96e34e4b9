//! Symptom triage: normalize free text, score conditions by loose symptom
//! matching, rank the matches.

pub mod engine;
pub mod normalize;
pub mod ranking;
pub mod scoring;
pub mod types;

pub use engine::{evaluate, DefaultTriageEngine, TriageEngine};
pub use normalize::{normalize, Normalized};
pub use ranking::rank;
pub use scoring::score;
pub use types::*;
