//! Diversity engine: category weights, similarity checks, diversity scores.
//!
//! Every operation reads one window from the history store and computes the
//! rest from that snapshot. Nothing derived is cached between calls.

pub mod engine;
pub mod monitor;
pub mod types;

pub use engine::{category_usage, keyword_frequency, similar_in, DiversityEngine};
pub use monitor::monitor_recommendations;
pub use types::*;
