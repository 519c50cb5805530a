use std::sync::OnceLock;

use regex::Regex;

use crate::vectorizer::{config::Granularity, token::TokenFrequency};

/// Word terms: runs of at least two word characters
pub const TERM_PATTERN: &str = r"\b\w\w+\b";

static DEFAULT_PATTERN: OnceLock<Regex> = OnceLock::new();

fn default_pattern() -> Regex {
    DEFAULT_PATTERN
        .get_or_init(|| Regex::new(TERM_PATTERN).expect("valid term regex"))
        .clone()
}

/// Splits normalized text into vocabulary terms.
///
/// Text is lowercased, words are extracted with the term pattern and, for
/// bigrams, consecutive words are joined by one space.
#[derive(Debug, Clone)]
pub struct TermAnalyzer {
    pattern: Regex,
    n: usize,
}

impl TermAnalyzer {
    pub fn new(granularity: Granularity) -> Self {
        Self {
            pattern: default_pattern(),
            n: granularity.n(),
        }
    }

    /// Lowercased word terms in order of appearance
    pub fn words(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        self.pattern
            .find_iter(&lower)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// n-gram terms in order of appearance (duplicates kept)
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let words = self.words(text);
        if self.n <= 1 {
            return words;
        }
        words.windows(self.n).map(|w| w.join(" ")).collect()
    }

    /// Count the terms of a text
    pub fn term_frequency(&self, text: &str) -> TokenFrequency {
        let mut freq = TokenFrequency::new();
        freq.add_tokens(&self.analyze(text));
        freq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_tokens_and_punctuation_are_ignored() {
        let analyzer = TermAnalyzer::new(Granularity::Unigram);
        assert_eq!(
            analyzer.analyze("Neural network , a x-ray model ."),
            vec!["neural", "network", "ray", "model"]
        );
    }

    #[test]
    fn bigrams_join_consecutive_words() {
        let analyzer = TermAnalyzer::new(Granularity::Bigram);
        assert_eq!(
            analyzer.analyze("deep neural network"),
            vec!["deep neural", "neural network"]
        );
        assert!(analyzer.analyze("single").is_empty());
    }

    #[test]
    fn term_frequency_counts_repeats() {
        let analyzer = TermAnalyzer::new(Granularity::Unigram);
        let freq = analyzer.term_frequency("graph graph index");
        assert_eq!(freq.token_count("graph"), 2);
        assert_eq!(freq.token_count("index"), 1);
        assert_eq!(freq.token_sum(), 3);
    }
}
