//! Sentence segmentation

use unicode_segmentation::UnicodeSegmentation;

/// Non-empty, trimmed sentences of `text`
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.unicode_sentences()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Segment and re-join with single spaces
pub fn join_sentences(text: &str) -> String {
    split_sentences(text).join(" ")
}
