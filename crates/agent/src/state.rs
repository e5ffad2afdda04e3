//! Per-session conversation state

use std::sync::Arc;

use tax_assistant_core::{DialogueStage, Error, Result, Scheme, TaxBracket};

use crate::AgentError;

/// A recorded stage change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTransition {
    pub from: DialogueStage,
    pub to: DialogueStage,
}

/// Everything one session has collected so far
///
/// Owned by exactly one controller. Recommendations are replaced as a whole
/// when a new income/age pair is evaluated.
#[derive(Debug, Clone)]
pub struct ConversationState {
    session_id: String,
    stage: DialogueStage,
    /// Where to return if income/age collection fails
    resume_stage: DialogueStage,
    pending_income: Option<f64>,
    income: Option<f64>,
    age: Option<u32>,
    bracket: Option<TaxBracket>,
    recommendations: Vec<Arc<Scheme>>,
    selected: Option<Arc<Scheme>>,
    history: Vec<StageTransition>,
    turns: u64,
}

impl ConversationState {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            stage: DialogueStage::Start,
            resume_stage: DialogueStage::Start,
            pending_income: None,
            income: None,
            age: None,
            bracket: None,
            recommendations: Vec::new(),
            selected: None,
            history: Vec::new(),
            turns: 0,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn stage(&self) -> DialogueStage {
        self.stage
    }

    pub fn history(&self) -> &[StageTransition] {
        &self.history
    }

    pub fn income(&self) -> Option<f64> {
        self.income
    }

    pub fn age(&self) -> Option<u32> {
        self.age
    }

    pub fn bracket(&self) -> Option<TaxBracket> {
        self.bracket
    }

    pub fn recommendations(&self) -> &[Arc<Scheme>] {
        &self.recommendations
    }

    pub fn selected(&self) -> Option<&Arc<Scheme>> {
        self.selected.as_ref()
    }

    /// Count a new turn and return its 1-based number
    pub fn begin_turn(&mut self) -> u64 {
        self.turns += 1;
        self.turns
    }

    pub fn turns(&self) -> u64 {
        self.turns
    }

    pub fn pending_income(&self) -> Option<f64> {
        self.pending_income
    }

    /// Move to `to`. Staying in the current stage is always allowed.
    pub fn transition(&mut self, to: DialogueStage) -> std::result::Result<(), AgentError> {
        let from = self.stage;
        if from == to {
            return Ok(());
        }
        if !from.can_transition_to(to) {
            return Err(AgentError::Stage(format!(
                "Invalid transition from {} to {}",
                from, to
            )));
        }

        tracing::debug!(session = %self.session_id, %from, %to, "Stage transition");
        self.stage = to;
        self.history.push(StageTransition { from, to });
        Ok(())
    }

    /// Start collecting income and age, remembering where we came from
    pub fn begin_collection(&mut self) -> std::result::Result<(), AgentError> {
        let resume = self.stage;
        self.transition(DialogueStage::AwaitIncomeAge)?;
        self.resume_stage = resume;
        self.pending_income = None;
        Ok(())
    }

    pub fn set_pending_income(&mut self, income: f64) {
        self.pending_income = Some(income);
    }

    /// Drop partially collected data and return to the stage before collection
    pub fn abandon_collection(&mut self) -> std::result::Result<(), AgentError> {
        self.pending_income = None;
        self.transition(self.resume_stage)
    }

    /// Store a completed evaluation, replacing any previous one
    pub fn store_results(
        &mut self,
        income: f64,
        age: u32,
        bracket: TaxBracket,
        recommendations: Vec<Arc<Scheme>>,
    ) {
        self.pending_income = None;
        self.income = Some(income);
        self.age = Some(age);
        self.bracket = Some(bracket);
        self.recommendations = recommendations;
        self.selected = None;
    }

    /// Select a recommendation by its 1-based list position
    pub fn select(&mut self, choice: usize) -> Result<Arc<Scheme>> {
        let scheme = choice
            .checked_sub(1)
            .and_then(|index| self.recommendations.get(index))
            .cloned()
            .ok_or_else(|| {
                Error::invalid_input(format!(
                    "choice {} is outside 1..={}",
                    choice,
                    self.recommendations.len()
                ))
            })?;
        self.selected = Some(Arc::clone(&scheme));
        Ok(scheme)
    }
}
