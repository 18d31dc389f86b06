//! Keyword extraction and topic similarity.
//!
//! Every similarity number in Topicwise comes from [`similarity`]: Jaccard
//! overlap between the stop-word-filtered keyword sets of two strings.

pub mod keywords;
pub mod similarity;

pub use keywords::{extract_keywords, extract_tokens, KeywordExtractor};
pub use similarity::{jaccard, max_similarity, pairwise_diversity, similarity, SimilarityResult};
