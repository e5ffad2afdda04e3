//! Offline extractive QA
//!
//! Answers with the context sentence sharing the most words with the
//! question. Ties go to the earliest sentence.

use async_trait::async_trait;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

use tax_assistant_core::{ContextQa, Result};
use tax_assistant_text_processing::split_sentences;

use crate::LlmError;

#[derive(Debug, Clone, Default)]
pub struct ExtractiveQa;

impl ExtractiveQa {
    pub fn new() -> Self {
        Self
    }

    fn word_set(text: &str) -> HashSet<String> {
        text.unicode_words().map(|w| w.to_lowercase()).collect()
    }

    /// Best sentence for the question, `None` for an empty context
    pub fn best_sentence<'a>(&self, question: &str, context: &'a str) -> Option<&'a str> {
        let question_words = Self::word_set(question);
        let mut best: Option<(&str, usize)> = None;

        for sentence in split_sentences(context) {
            let overlap = Self::word_set(sentence)
                .intersection(&question_words)
                .count();
            if best.map_or(true, |(_, score)| overlap > score) {
                best = Some((sentence, overlap));
            }
        }

        best.map(|(sentence, _)| sentence)
    }
}

#[async_trait]
impl ContextQa for ExtractiveQa {
    async fn answer(&self, question: &str, context: &str) -> Result<String> {
        self.best_sentence(question, context)
            .map(str::to_string)
            .ok_or_else(|| LlmError::NoAnswer("empty context".to_string()).into())
    }

    fn name(&self) -> &str {
        "extractive"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tax_assistant_core::Error;

    #[tokio::test]
    async fn test_picks_most_relevant_sentence() {
        let qa = ExtractiveQa::new();
        let context = "I have a home loan. Tell me more about tax-saving schemes for my family. Thanks.";
        let answer = qa
            .answer("Tell me more about tax-saving schemes?", context)
            .await
            .unwrap();
        assert_eq!(answer, "Tell me more about tax-saving schemes for my family.");
    }

    #[tokio::test]
    async fn test_ties_go_to_first_sentence() {
        let qa = ExtractiveQa::new();
        let answer = qa.answer("pension", "Alpha. Beta.").await.unwrap();
        assert_eq!(answer, "Alpha.");
    }

    #[tokio::test]
    async fn test_empty_context_is_unavailable() {
        let qa = ExtractiveQa::new();
        let err = qa.answer("anything?", "   ").await.unwrap_err();
        assert!(matches!(err, Error::QaUnavailable(_)));
    }
}
