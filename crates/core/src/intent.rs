//! Intent labels produced by the intent classifier

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of conversational intents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentLabel {
    Greeting,
    Affirm,
    Deny,
    Exit,
    MoreInfo,
    Help,
    Unknown,
}

impl IntentLabel {
    /// Labels a classifier may match, in precedence order.
    ///
    /// When an utterance matches several sets, the first label here wins.
    /// `Unknown` is the fallback and never matched directly.
    pub const PRECEDENCE: [IntentLabel; 6] = [
        IntentLabel::Greeting,
        IntentLabel::Affirm,
        IntentLabel::Deny,
        IntentLabel::Exit,
        IntentLabel::MoreInfo,
        IntentLabel::Help,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IntentLabel::Greeting => "greeting",
            IntentLabel::Affirm => "affirm",
            IntentLabel::Deny => "deny",
            IntentLabel::Exit => "exit",
            IntentLabel::MoreInfo => "more_info",
            IntentLabel::Help => "help",
            IntentLabel::Unknown => "unknown",
        }
    }
}

impl fmt::Display for IntentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_order() {
        assert_eq!(IntentLabel::PRECEDENCE[0], IntentLabel::Greeting);
        assert_eq!(IntentLabel::PRECEDENCE[1], IntentLabel::Affirm);
        assert!(!IntentLabel::PRECEDENCE.contains(&IntentLabel::Unknown));
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&IntentLabel::MoreInfo).unwrap();
        assert_eq!(json, "\"more_info\"");
    }
}
