//! Dialogue controller
//!
//! Drives one session through the dialogue stages. Each call to
//! [`DialogueController::handle`] is one request/response turn: the
//! utterance is interpreted according to the current stage, replies are
//! produced in order, and the stage advances. Invalid input and QA failures
//! are recovered within the turn; only Deny and Exit end the session.

use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

use tax_assistant_config::{ResponseTemplates, Settings};
use tax_assistant_core::{ContextQa, DialogueStage, Error, IntentClassifier, IntentLabel};
use tax_assistant_text_processing::{join_sentences, parse_age, parse_choice, parse_income};
use tax_assistant_tools::EligibilityEngine;

use crate::response::{bracket_statement, list_entry, scheme_details};
use crate::state::ConversationState;

/// Controller configuration
#[derive(Debug, Clone)]
pub struct DialogueConfig {
    pub responses: ResponseTemplates,
    /// Question put to the QA service on more-info requests
    pub qa_question: String,
    /// Upper bound for one QA call
    pub qa_timeout: Duration,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl DialogueConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            responses: settings.responses.clone(),
            qa_question: settings.assistant.qa_question.clone(),
            qa_timeout: settings.qa.timeout(),
        }
    }
}

/// Result of one turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    /// Replies, in order
    pub replies: Vec<String>,
    /// Stage after the turn
    pub stage: DialogueStage,
    /// Classified intent, if the utterance was classified
    pub intent: Option<IntentLabel>,
    /// Error recovered during the turn
    pub error: Option<Error>,
}

impl TurnOutcome {
    pub fn is_ended(&self) -> bool {
        self.stage.is_terminal()
    }
}

/// Replies and bookkeeping collected while handling a turn
#[derive(Default)]
struct Turn {
    replies: Vec<String>,
    intent: Option<IntentLabel>,
    error: Option<Error>,
}

impl Turn {
    fn say(&mut self, reply: impl Into<String>) {
        self.replies.push(reply.into());
    }

    fn fail(&mut self, error: Error, reply: impl Into<String>) {
        tracing::warn!(error = %error, "Recovered from turn error");
        self.error = Some(error);
        self.say(reply);
    }
}

/// Session-scoped dialogue controller
pub struct DialogueController {
    engine: EligibilityEngine,
    classifier: Arc<dyn IntentClassifier>,
    qa: Arc<dyn ContextQa>,
    config: DialogueConfig,
    state: ConversationState,
}

impl DialogueController {
    pub fn new(
        engine: EligibilityEngine,
        classifier: Arc<dyn IntentClassifier>,
        qa: Arc<dyn ContextQa>,
        config: DialogueConfig,
    ) -> Self {
        let session_id = uuid::Uuid::new_v4().to_string();
        tracing::info!(
            session = %session_id,
            classifier = classifier.name(),
            qa = qa.name(),
            "Dialogue session created"
        );
        Self {
            engine,
            classifier,
            qa,
            config,
            state: ConversationState::new(session_id),
        }
    }

    /// First line of the session, shown before any input
    pub fn opening(&self) -> &str {
        &self.config.responses.opening
    }

    pub fn stage(&self) -> DialogueStage {
        self.state.stage()
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn session_id(&self) -> &str {
        self.state.session_id()
    }

    pub fn is_ended(&self) -> bool {
        self.state.stage().is_terminal()
    }

    /// End the session from outside the dialogue (idle input, shutdown)
    ///
    /// Returns the goodbye reply, or nothing if the session already ended.
    pub fn close(&mut self) -> Vec<String> {
        if self.is_ended() {
            return Vec::new();
        }
        let mut turn = Turn::default();
        self.end(self.config.responses.goodbye.clone(), &mut turn);
        turn.replies
    }

    /// Handle one user utterance
    pub async fn handle(&mut self, text: &str) -> TurnOutcome {
        if self.is_ended() {
            return TurnOutcome {
                replies: Vec::new(),
                stage: DialogueStage::Ended,
                intent: None,
                error: None,
            };
        }

        let turn_number = self.state.begin_turn();
        let span = tracing::info_span!(
            "turn",
            session = %self.state.session_id(),
            turn = turn_number,
            stage = %self.state.stage()
        );

        let turn = self.dispatch(text).instrument(span).await;
        TurnOutcome {
            replies: turn.replies,
            stage: self.state.stage(),
            intent: turn.intent,
            error: turn.error,
        }
    }

    async fn dispatch(&mut self, text: &str) -> Turn {
        let mut turn = Turn::default();
        let intent = self.classifier.classify(text);
        turn.intent = Some(intent);
        tracing::debug!(%intent, "Classified utterance");

        match self.state.stage() {
            DialogueStage::AwaitIncomeAge => self.handle_field(text, intent, &mut turn),
            stage if stage.accepts_scheme_choice() => {
                self.handle_choice(text, intent, stage.expects_field_input(), &mut turn)
                    .await
            }
            _ => self.handle_intent(text, intent, &mut turn).await,
        }
        turn
    }

    /// Income, then age. Only Exit is honoured while a field is pending.
    fn handle_field(&mut self, text: &str, intent: IntentLabel, turn: &mut Turn) {
        if intent == IntentLabel::Exit {
            self.end(self.config.responses.goodbye.clone(), turn);
            return;
        }

        match self.state.pending_income() {
            None => match parse_income(text) {
                Ok(income) => {
                    self.state.set_pending_income(income);
                    turn.say(self.config.responses.ask_age.clone());
                }
                Err(err) => self.abandon_collection(err, turn),
            },
            Some(income) => match parse_age(text) {
                Ok(age) => self.present_recommendations(income, age, turn),
                Err(err) => self.abandon_collection(err, turn),
            },
        }
    }

    fn abandon_collection(&mut self, err: Error, turn: &mut Turn) {
        turn.fail(err, self.config.responses.invalid_income_age.clone());
        if let Err(e) = self.state.abandon_collection() {
            tracing::error!(error = %e, "Failed to leave income/age collection");
        }
    }

    fn present_recommendations(&mut self, income: f64, age: u32, turn: &mut Turn) {
        let evaluated = self
            .engine
            .classify_income(income)
            .and_then(|bracket| Ok((bracket, self.engine.recommend(income, age)?)));
        let (bracket, schemes) = match evaluated {
            Ok(result) => result,
            Err(err) => {
                self.abandon_collection(err, turn);
                return;
            }
        };

        tracing::info!(%bracket, age, schemes = schemes.len(), "Evaluated income and age");
        turn.say(bracket_statement(income, bracket));

        let next = if schemes.is_empty() {
            turn.say(self.config.responses.no_schemes.clone());
            DialogueStage::AwaitConsent
        } else {
            turn.say(self.config.responses.recommendations_header.clone());
            for (index, scheme) in schemes.iter().enumerate() {
                turn.say(list_entry(index + 1, scheme));
            }
            turn.say(self.config.responses.drill_down_prompt.clone());
            DialogueStage::AwaitDrillDownChoice
        };

        self.state.store_results(income, age, bracket, schemes);
        self.move_to(next);
    }

    /// Drill-down over the stored recommendation list
    ///
    /// `strict` is set while the numbered prompt is outstanding: non-numeric
    /// text is then invalid input rather than a new request. The prompt is
    /// answered once; after an invalid reply later turns go through intents
    /// again while the list stays selectable.
    async fn handle_choice(&mut self, text: &str, intent: IntentLabel, strict: bool, turn: &mut Turn) {
        if intent == IntentLabel::Deny {
            turn.say(self.config.responses.drill_down_declined.clone());
            self.move_to(DialogueStage::AwaitConsent);
            return;
        }

        match parse_choice(text) {
            Ok(choice) => match self.state.select(choice) {
                Ok(scheme) => {
                    tracing::debug!(scheme = %scheme.id, "Showing scheme details");
                    for reply in scheme_details(&scheme) {
                        turn.say(reply);
                    }
                    self.move_to(DialogueStage::ShowingRecommendations);
                }
                Err(err) => {
                    turn.fail(err, self.config.responses.invalid_choice.clone());
                    self.move_to(DialogueStage::ShowingRecommendations);
                }
            },
            Err(_) if !strict => self.handle_intent(text, intent, turn).await,
            Err(_) if intent == IntentLabel::Exit => {
                self.end(self.config.responses.goodbye.clone(), turn)
            }
            Err(err) => {
                turn.fail(err, self.config.responses.invalid_number.clone());
                self.move_to(DialogueStage::ShowingRecommendations);
            }
        }
    }

    /// Conversational stages: dispatch on the intent alone
    async fn handle_intent(&mut self, text: &str, intent: IntentLabel, turn: &mut Turn) {
        match intent {
            IntentLabel::Greeting => turn.say(self.config.responses.greeting.clone()),
            IntentLabel::Affirm => match self.state.begin_collection() {
                Ok(()) => turn.say(self.config.responses.ask_income.clone()),
                Err(e) => tracing::error!(error = %e, "Failed to start income/age collection"),
            },
            IntentLabel::Deny => self.end(self.config.responses.deny.clone(), turn),
            IntentLabel::Exit => self.end(self.config.responses.goodbye.clone(), turn),
            IntentLabel::MoreInfo => self.answer_question(text, turn).await,
            IntentLabel::Help => turn.say(self.config.responses.help.clone()),
            IntentLabel::Unknown => turn.say(self.config.responses.clarify.clone()),
        }
    }

    /// Ask the QA service, using the utterance itself as context
    async fn answer_question(&self, text: &str, turn: &mut Turn) {
        let context = join_sentences(text);
        let question = &self.config.qa_question;

        let result = match tokio::time::timeout(
            self.config.qa_timeout,
            self.qa.answer(question, &context),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(Error::qa_unavailable(format!(
                "no answer within {:?}",
                self.config.qa_timeout
            ))),
        };

        match result {
            Ok(answer) => turn.say(answer),
            Err(err) => {
                let err = match err {
                    Error::QaUnavailable(_) => err,
                    other => Error::qa_unavailable(other.to_string()),
                };
                turn.fail(err, self.config.responses.qa_unavailable.clone());
            }
        }
    }

    fn end(&mut self, reply: String, turn: &mut Turn) {
        turn.say(reply);
        self.move_to(DialogueStage::Ended);
        tracing::info!(
            session = %self.state.session_id(),
            turns = self.state.turns(),
            income = ?self.state.income(),
            age = ?self.state.age(),
            bracket = ?self.state.bracket(),
            "Dialogue session ended"
        );
    }

    fn move_to(&mut self, stage: DialogueStage) {
        if let Err(e) = self.state.transition(stage) {
            tracing::error!(error = %e, "Rejected stage transition");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tax_assistant_config::TaxCatalog;
    use tax_assistant_core::Result;
    use tax_assistant_text_processing::KeywordIntentClassifier;

    struct FixedQa;

    #[async_trait::async_trait]
    impl ContextQa for FixedQa {
        async fn answer(&self, _question: &str, context: &str) -> Result<String> {
            Ok(format!("echo: {}", context))
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn controller() -> DialogueController {
        let catalog = Arc::new(TaxCatalog::builtin().unwrap());
        DialogueController::new(
            EligibilityEngine::new(catalog),
            Arc::new(KeywordIntentClassifier::default()),
            Arc::new(FixedQa),
            DialogueConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_greeting_stays_in_start() {
        let mut controller = controller();
        let outcome = controller.handle("hello").await;
        assert_eq!(outcome.intent, Some(IntentLabel::Greeting));
        assert_eq!(outcome.stage, DialogueStage::Start);
        assert_eq!(outcome.replies.len(), 1);
    }

    #[tokio::test]
    async fn test_more_info_uses_utterance_as_context() {
        let mut controller = controller();
        let outcome = controller.handle("Tell me more.   About NPS?").await;
        assert_eq!(outcome.replies, vec!["echo: Tell me more. About NPS?"]);
        assert_eq!(outcome.stage, DialogueStage::Start);
    }

    #[tokio::test]
    async fn test_unknown_asks_to_rephrase() {
        let mut controller = controller();
        let outcome = controller.handle("what's the weather").await;
        assert_eq!(outcome.intent, Some(IntentLabel::Unknown));
        assert_eq!(outcome.replies, vec![DialogueConfig::default().responses.clarify]);
    }

    #[test]
    fn test_close() {
        let mut controller = controller();
        assert_eq!(controller.close(), vec!["Goodbye! Have a great day!"]);
        assert!(controller.is_ended());
        assert!(controller.close().is_empty());
    }

    #[test]
    fn test_session_ids_are_unique() {
        assert_ne!(controller().session_id(), controller().session_id());
    }
}
