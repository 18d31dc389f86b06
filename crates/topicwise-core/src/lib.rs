//! Topicwise Core: content model, category definitions, configuration.

pub mod category;
pub mod config;
pub mod content;
pub mod error;

pub use category::{CategoryDef, CategorySet};
pub use config::{DataPaths, DiversityConfig, TopicwiseConfig};
pub use content::{window_start, ContentRecord, Difficulty, NewContent};
pub use error::{Error, Result};
