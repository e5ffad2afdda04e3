//! Intent keyword configuration
//!
//! Keyword sets used by the keyword intent classifier. Matching is done on
//! lowercased words, so entries are stored lowercase.

use serde::{Deserialize, Serialize};

use tax_assistant_core::IntentLabel;

use crate::ConfigError;

/// Keyword sets per intent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentKeywordsConfig {
    pub greeting: Vec<String>,
    pub affirm: Vec<String>,
    pub deny: Vec<String>,
    pub exit: Vec<String>,
    pub more_info: Vec<String>,
    pub help: Vec<String>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for IntentKeywordsConfig {
    fn default() -> Self {
        Self {
            greeting: words(&["hello", "hi", "hey"]),
            affirm: words(&["yes", "yeah", "yup"]),
            deny: words(&["no", "nope", "nah"]),
            exit: words(&["exit", "quit"]),
            more_info: words(&["more", "details", "information"]),
            help: words(&["help", "assistance"]),
        }
    }
}

impl IntentKeywordsConfig {
    /// Keywords for a label. `Unknown` has none.
    pub fn keywords_for(&self, label: IntentLabel) -> &[String] {
        match label {
            IntentLabel::Greeting => &self.greeting,
            IntentLabel::Affirm => &self.affirm,
            IntentLabel::Deny => &self.deny,
            IntentLabel::Exit => &self.exit,
            IntentLabel::MoreInfo => &self.more_info,
            IntentLabel::Help => &self.help,
            IntentLabel::Unknown => &[],
        }
    }

    /// Every matchable intent needs at least one non-blank keyword
    pub fn validate(&self) -> Result<(), ConfigError> {
        for label in IntentLabel::PRECEDENCE {
            let keywords = self.keywords_for(label);
            if keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(ConfigError::invalid(
                    format!("intents.{}", label.as_str()),
                    "at least one keyword is required",
                ));
            }
        }
        Ok(())
    }
}
