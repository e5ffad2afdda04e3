//! Intent classification trait

use crate::intent::IntentLabel;

/// Maps a raw user utterance to exactly one [`IntentLabel`]
///
/// Implementations must be deterministic and total: every input yields a
/// label, `Unknown` when nothing matches. When an utterance matches several
/// intents, the first one in [`IntentLabel::PRECEDENCE`] wins.
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> IntentLabel;

    /// Classifier name for logging
    fn name(&self) -> &str {
        "intent-classifier"
    }
}
