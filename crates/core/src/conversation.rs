//! Dialogue stages of a tax assistant session

use serde::{Deserialize, Serialize};

/// Stage of the interaction state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DialogueStage {
    /// Session opened, nothing collected yet
    #[default]
    Start,
    /// Recommendations were delivered (or declined); waiting for the user to
    /// ask for another round
    AwaitConsent,
    /// Collecting annual income, then age
    AwaitIncomeAge,
    /// A scheme's details were shown; the list is still selectable
    ShowingRecommendations,
    /// The numbered list was shown and a choice is expected
    AwaitDrillDownChoice,
    /// Terminal
    Ended,
}

impl DialogueStage {
    /// Get allowed transitions from current stage
    pub fn allowed_transitions(&self) -> Vec<DialogueStage> {
        match self {
            DialogueStage::Start => vec![DialogueStage::AwaitIncomeAge, DialogueStage::Ended],
            DialogueStage::AwaitConsent => {
                vec![DialogueStage::AwaitIncomeAge, DialogueStage::Ended]
            }
            DialogueStage::AwaitIncomeAge => vec![
                DialogueStage::AwaitDrillDownChoice,
                // empty recommendation list
                DialogueStage::AwaitConsent,
                // invalid income/age: back to where the user said yes
                DialogueStage::Start,
                DialogueStage::ShowingRecommendations,
                DialogueStage::Ended,
            ],
            DialogueStage::AwaitDrillDownChoice => vec![
                DialogueStage::ShowingRecommendations,
                DialogueStage::AwaitConsent,
                DialogueStage::Ended,
            ],
            DialogueStage::ShowingRecommendations => vec![
                DialogueStage::AwaitIncomeAge,
                DialogueStage::AwaitConsent,
                DialogueStage::Ended,
            ],
            DialogueStage::Ended => vec![],
        }
    }

    /// Check if transition to target stage is allowed
    pub fn can_transition_to(&self, target: DialogueStage) -> bool {
        self.allowed_transitions().contains(&target)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DialogueStage::Ended)
    }

    /// Stages where the next turn is read as a field value rather than
    /// classified as an intent
    pub fn expects_field_input(&self) -> bool {
        matches!(
            self,
            DialogueStage::AwaitIncomeAge | DialogueStage::AwaitDrillDownChoice
        )
    }

    /// Stages that hold a selectable recommendation list
    pub fn accepts_scheme_choice(&self) -> bool {
        matches!(
            self,
            DialogueStage::AwaitDrillDownChoice | DialogueStage::ShowingRecommendations
        )
    }
}

impl std::fmt::Display for DialogueStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DialogueStage::Start => write!(f, "Start"),
            DialogueStage::AwaitConsent => write!(f, "Await Consent"),
            DialogueStage::AwaitIncomeAge => write!(f, "Await Income/Age"),
            DialogueStage::ShowingRecommendations => write!(f, "Showing Recommendations"),
            DialogueStage::AwaitDrillDownChoice => write!(f, "Await Drill-Down Choice"),
            DialogueStage::Ended => write!(f, "Ended"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_transitions() {
        let stage = DialogueStage::Start;
        assert!(stage.can_transition_to(DialogueStage::AwaitIncomeAge));
        assert!(stage.can_transition_to(DialogueStage::Ended));
        assert!(!stage.can_transition_to(DialogueStage::AwaitDrillDownChoice));
    }

    #[test]
    fn test_ended_is_terminal() {
        assert!(DialogueStage::Ended.is_terminal());
        assert!(DialogueStage::Ended.allowed_transitions().is_empty());
        assert!(!DialogueStage::AwaitConsent.is_terminal());
    }

    #[test]
    fn test_every_stage_can_end() {
        for stage in [
            DialogueStage::Start,
            DialogueStage::AwaitConsent,
            DialogueStage::AwaitIncomeAge,
            DialogueStage::ShowingRecommendations,
            DialogueStage::AwaitDrillDownChoice,
        ] {
            assert!(stage.can_transition_to(DialogueStage::Ended), "{}", stage);
        }
    }

    #[test]
    fn test_choice_stages() {
        assert!(DialogueStage::AwaitDrillDownChoice.accepts_scheme_choice());
        assert!(DialogueStage::ShowingRecommendations.accepts_scheme_choice());
        assert!(!DialogueStage::Start.accepts_scheme_choice());
        assert!(DialogueStage::AwaitIncomeAge.expects_field_input());
        assert!(!DialogueStage::ShowingRecommendations.expects_field_input());
    }
}
