//! Topicwise Catalog: the bank of candidate topics.
//!
//! A [`TopicCatalog`] is built once at startup (from the bundled topic bank or
//! a JSON override) and shared read-only by every selector and validator.

pub mod catalog;

pub use catalog::{CatalogEntry, CategoryStats, CategoryTopics, TopicCatalog, FALLBACK_TOPIC};
