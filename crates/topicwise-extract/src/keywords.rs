//! Stop-word filtered keyword extraction.

use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashSet};

/// Articles, conjunctions, prepositions, pronouns and auxiliary verbs.
pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "is", "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will",
    "would", "could", "should", "may", "might", "can", "this", "that", "these", "those", "i",
    "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them",
];

/// Tokens with this many characters or fewer are dropped.
const MIN_TOKEN_CHARS: usize = 2;

static DEFAULT_EXTRACTOR: Lazy<KeywordExtractor> = Lazy::new(KeywordExtractor::default);

/// Tokenizes text into lowercase keywords.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    stop_words: HashSet<&'static str>,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
        }
    }
}

impl KeywordExtractor {
    /// Keywords in input order, duplicates kept (for frequency counting).
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        lower
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|word| word.chars().count() > MIN_TOKEN_CHARS)
            .filter(|word| !self.stop_words.contains(word))
            .map(str::to_string)
            .collect()
    }

    /// Distinct keywords of `text`. Empty for empty or stop-word-only input.
    pub fn extract(&self, text: &str) -> BTreeSet<String> {
        self.tokens(text).into_iter().collect()
    }
}

/// [`KeywordExtractor::extract`] with the default stop-word list.
pub fn extract_keywords(text: &str) -> BTreeSet<String> {
    DEFAULT_EXTRACTOR.extract(text)
}

/// [`KeywordExtractor::tokens`] with the default stop-word list.
pub fn extract_tokens(text: &str) -> Vec<String> {
    DEFAULT_EXTRACTOR.tokens(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_filters() {
        let kws = extract_keywords("Drink Lemon Water for Energy");
        let expected: BTreeSet<String> = ["drink", "lemon", "water", "energy"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(kws, expected);
    }

    #[test]
    fn test_drops_short_tokens() {
        let kws = extract_keywords("Do 20 squats at 6 am");
        assert_eq!(kws.len(), 1);
        assert!(kws.contains("squats"));
    }

    #[test]
    fn test_splits_on_punctuation() {
        let kws = extract_keywords("High-intensity interval training (HIIT)");
        assert!(kws.contains("high"));
        assert!(kws.contains("intensity"));
        assert!(kws.contains("hiit"));
    }

    #[test]
    fn test_stop_words_only() {
        assert!(extract_keywords("the and of them").is_empty());
        assert!(extract_keywords("").is_empty());
    }

    #[test]
    fn test_tokens_keep_duplicates() {
        let tokens = extract_tokens("water water everywhere");
        assert_eq!(tokens, vec!["water", "water", "everywhere"]);
    }

    #[test]
    fn test_deterministic() {
        let text = "Morning stretch routine for flexible hamstrings";
        assert_eq!(extract_keywords(text), extract_keywords(text));
    }
}
