//! Keyword intent classifier
//!
//! Utterances are case-folded and split into Unicode words. A word matches a
//! keyword set verbatim or through a naive lemma (trailing "s" dropped from
//! words longer than three letters). Sets are tried in
//! [`IntentLabel::PRECEDENCE`] order and the first hit wins.
//!
//! # Example
//!
//! ```
//! use tax_assistant_config::IntentKeywordsConfig;
//! use tax_assistant_core::{IntentClassifier, IntentLabel};
//! use tax_assistant_text_processing::KeywordIntentClassifier;
//!
//! let classifier = KeywordIntentClassifier::new(&IntentKeywordsConfig::default());
//! assert_eq!(classifier.classify("hi, yes please"), IntentLabel::Greeting);
//! ```

use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

use tax_assistant_config::IntentKeywordsConfig;
use tax_assistant_core::{IntentClassifier, IntentLabel};

#[derive(Debug, Clone)]
pub struct KeywordIntentClassifier {
    /// Keyword sets in precedence order
    sets: Vec<(IntentLabel, HashSet<String>)>,
}

impl KeywordIntentClassifier {
    pub fn new(config: &IntentKeywordsConfig) -> Self {
        let sets = IntentLabel::PRECEDENCE
            .iter()
            .map(|&label| {
                let keywords = config
                    .keywords_for(label)
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
                (label, keywords)
            })
            .collect();
        Self { sets }
    }

    fn matches(keywords: &HashSet<String>, word: &str) -> bool {
        keywords.contains(word) || lemma(word).map_or(false, |l| keywords.contains(l))
    }
}

impl Default for KeywordIntentClassifier {
    fn default() -> Self {
        Self::new(&IntentKeywordsConfig::default())
    }
}

/// Naive singular form: "details" -> "detail"
fn lemma(word: &str) -> Option<&str> {
    if word.chars().count() > 3 {
        word.strip_suffix('s')
    } else {
        None
    }
}

impl IntentClassifier for KeywordIntentClassifier {
    fn classify(&self, text: &str) -> IntentLabel {
        let normalized = text.trim().to_lowercase();
        let words: Vec<&str> = normalized.unicode_words().collect();

        let label = self
            .sets
            .iter()
            .find(|(_, keywords)| words.iter().any(|w| Self::matches(keywords, w)))
            .map(|(label, _)| *label)
            .unwrap_or(IntentLabel::Unknown);

        tracing::trace!(words = words.len(), intent = %label, "Classified utterance");
        label
    }

    fn name(&self) -> &str {
        "keyword"
    }
}
