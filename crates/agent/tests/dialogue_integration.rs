//! Integration tests for the dialogue controller
//!
//! These tests drive whole sessions through the built-in catalog, the
//! keyword classifier and the extractive QA backend.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use tax_assistant_agent::{DialogueConfig, DialogueController, TurnOutcome};
use tax_assistant_config::TaxCatalog;
use tax_assistant_core::{ContextQa, DialogueStage, Error, IntentLabel, Result};
use tax_assistant_llm::ExtractiveQa;
use tax_assistant_text_processing::KeywordIntentClassifier;
use tax_assistant_tools::EligibilityEngine;

fn controller_with(catalog: TaxCatalog, qa: Arc<dyn ContextQa>, config: DialogueConfig) -> DialogueController {
    DialogueController::new(
        EligibilityEngine::new(Arc::new(catalog)),
        Arc::new(KeywordIntentClassifier::default()),
        qa,
        config,
    )
}

fn controller() -> DialogueController {
    controller_with(
        TaxCatalog::builtin().unwrap(),
        Arc::new(ExtractiveQa::new()),
        DialogueConfig::default(),
    )
}

fn copy() -> tax_assistant_config::ResponseTemplates {
    DialogueConfig::default().responses
}

async fn run(controller: &mut DialogueController, inputs: &[&str]) -> Vec<TurnOutcome> {
    let mut outcomes = Vec::new();
    for input in inputs {
        outcomes.push(controller.handle(input).await);
    }
    outcomes
}

/// hi, yes, income, age: ends with the numbered list outstanding
async fn controller_with_list(age: &str) -> DialogueController {
    let mut controller = controller();
    run(&mut controller, &["hi", "yes", "600000", age]).await;
    assert_eq!(controller.stage(), DialogueStage::AwaitDrillDownChoice);
    controller
}

struct SlowQa;

#[async_trait]
impl ContextQa for SlowQa {
    async fn answer(&self, _question: &str, _context: &str) -> Result<String> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok("too late".to_string())
    }

    fn name(&self) -> &str {
        "slow"
    }
}

struct BrokenQa;

#[async_trait]
impl ContextQa for BrokenQa {
    async fn answer(&self, _question: &str, _context: &str) -> Result<String> {
        Err(Error::qa_unavailable("model not loaded"))
    }

    fn name(&self) -> &str {
        "broken"
    }
}

#[tokio::test]
async fn test_full_session() {
    let mut controller = controller();
    let copy = copy();
    assert_eq!(
        controller.opening(),
        "Hello! I'm your Tax Saving Assistant. How can I assist you today?"
    );

    let outcomes = run(&mut controller, &["hi", "yes", "600000", "45", "1", "no"]).await;

    // hi
    assert_eq!(outcomes[0].intent, Some(IntentLabel::Greeting));
    assert_eq!(outcomes[0].replies, vec![copy.greeting.clone()]);

    // yes
    assert_eq!(outcomes[1].replies, vec![copy.ask_income.clone()]);
    assert_eq!(outcomes[1].stage, DialogueStage::AwaitIncomeAge);

    // income
    assert_eq!(outcomes[2].replies, vec![copy.ask_age.clone()]);

    // age: bracket statement, header, every scheme open to a 45 year old, prompt
    let replies = &outcomes[3].replies;
    assert_eq!(
        replies[0],
        "Based on your income of INR 600000, you fall under the '20% Tax Bracket'."
    );
    assert_eq!(replies[1], copy.recommendations_header);
    assert!(replies[2].starts_with("1. Section: Section 80C"));
    assert!(replies[3].starts_with("2. Section: Section 80D"));
    assert!(replies[4].starts_with("3. Section: Section 80E"));
    assert_eq!(replies[5], copy.drill_down_prompt);
    assert_eq!(outcomes[3].stage, DialogueStage::AwaitDrillDownChoice);

    // 1: details of Section 80C and its three investment options
    let details = &outcomes[4].replies;
    assert_eq!(details.len(), 4);
    assert!(details[0].starts_with("Detailed Information about Section 80C:"));
    assert!(details[1].starts_with("Investment: PPF"));
    assert!(details[2].starts_with("Investment: ELSS"));
    assert!(details[3].starts_with("Investment: NPS"));
    assert_eq!(outcomes[4].stage, DialogueStage::ShowingRecommendations);

    // no: acknowledged, session stays open
    assert_eq!(outcomes[5].replies, vec![copy.drill_down_declined.clone()]);
    assert_eq!(outcomes[5].stage, DialogueStage::AwaitConsent);
    assert!(!controller.is_ended());
    assert_eq!(controller.state().turns(), 6);

    // and can start over
    let again = controller.handle("yes").await;
    assert_eq!(again.stage, DialogueStage::AwaitIncomeAge);
}

#[tokio::test]
async fn test_greeting_takes_precedence_over_affirm() {
    let mut controller = controller();
    let outcome = controller.handle("hi yes").await;
    assert_eq!(outcome.intent, Some(IntentLabel::Greeting));
    assert_eq!(outcome.stage, DialogueStage::Start);
}

#[tokio::test]
async fn test_details_steps_in_order() {
    let mut controller = controller_with_list("45").await;
    let outcome = controller.handle("2").await;

    let insurance = &outcome.replies[1];
    let steps = [
        "- Purchase a health insurance policy from an insurance company.",
        "- Ensure the policy is in the name of the insured person.",
        "- Keep the premium receipts for claiming deductions.",
    ];
    let positions: Vec<usize> = steps.iter().map(|s| insurance.find(s).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(insurance.ends_with("Application Link: https://www.policybazaar.com/health-insurance/"));
}

#[tokio::test]
async fn test_age_over_limit_excludes_health_insurance() {
    let mut controller = controller();
    let outcomes = run(&mut controller, &["yes", "800000", "61"]).await;
    let list: Vec<_> = outcomes[2]
        .replies
        .iter()
        .filter(|r| r.contains(". Section: "))
        .collect();
    assert_eq!(list.len(), 2);
    assert!(list[0].starts_with("1. Section: Section 80C"));
    assert!(list[1].starts_with("2. Section: Section 80E"));

    // item 2 is now Section 80E
    let outcome = controller.handle("2").await;
    assert!(outcome.replies[0].starts_with("Detailed Information about Section 80E:"));
}

#[tokio::test]
async fn test_out_of_range_choice_keeps_list() {
    let mut controller = controller_with_list("45").await;
    let copy = copy();

    for choice in ["0", "4", "99"] {
        let outcome = controller.handle(choice).await;
        assert_eq!(outcome.replies, vec![copy.invalid_choice.clone()]);
        assert!(matches!(outcome.error, Some(Error::InvalidInput(_))));
        assert_eq!(outcome.stage, DialogueStage::ShowingRecommendations);
        assert_eq!(controller.state().recommendations().len(), 3);
        assert!(controller.state().selected().is_none());
    }

    let outcome = controller.handle("3").await;
    assert_eq!(outcome.stage, DialogueStage::ShowingRecommendations);
    assert!(outcome.error.is_none());
    assert!(outcome.replies[0].starts_with("Detailed Information about Section 80E:"));
}

#[tokio::test]
async fn test_intents_resume_after_invalid_choice() {
    let mut controller = controller_with_list("45").await;
    let copy = copy();

    let outcome = controller.handle("5").await;
    assert_eq!(outcome.replies, vec![copy.invalid_choice.clone()]);

    let outcome = controller.handle("help").await;
    assert_eq!(outcome.intent, Some(IntentLabel::Help));
    assert_eq!(outcome.replies, vec![copy.help.clone()]);
    assert!(outcome.error.is_none());

    let outcome = controller.handle("hello").await;
    assert_eq!(outcome.replies, vec![copy.greeting.clone()]);
    assert_eq!(outcome.stage, DialogueStage::ShowingRecommendations);

    let outcome = controller.handle("yes").await;
    assert_eq!(outcome.replies, vec![copy.ask_income.clone()]);
    assert_eq!(outcome.stage, DialogueStage::AwaitIncomeAge);
}

#[tokio::test]
async fn test_non_numeric_choice_is_answered_once() {
    let mut controller = controller_with_list("45").await;
    let copy = copy();

    let outcome = controller.handle("three").await;
    assert_eq!(outcome.replies, vec![copy.invalid_number.clone()]);
    assert!(matches!(outcome.error, Some(Error::InvalidInput(_))));
    assert_eq!(outcome.stage, DialogueStage::ShowingRecommendations);

    // back to intent dispatch; the list is still selectable
    let outcome = controller.handle("hello").await;
    assert_eq!(outcome.replies, vec![copy.greeting.clone()]);
    let outcome = controller.handle("1").await;
    assert!(outcome.replies[0].starts_with("Detailed Information about Section 80C:"));
}

#[tokio::test]
async fn test_invalid_income_returns_to_previous_stage() {
    let mut controller = controller();
    let copy = copy();

    let outcomes = run(&mut controller, &["yes", "lots of money"]).await;
    assert_eq!(outcomes[1].replies, vec![copy.invalid_income_age.clone()]);
    assert!(matches!(outcomes[1].error, Some(Error::InvalidInput(_))));
    assert_eq!(outcomes[1].stage, DialogueStage::Start);

    // partial income is discarded
    let outcomes = run(&mut controller, &["yes", "Rs. 6,00,000", "-3"]).await;
    assert_eq!(outcomes[1].replies, vec![copy.ask_age.clone()]);
    assert_eq!(outcomes[2].stage, DialogueStage::Start);
    assert!(controller.state().pending_income().is_none());
    assert!(controller.state().recommendations().is_empty());
}

#[tokio::test]
async fn test_invalid_age_after_recommendations_keeps_previous_list() {
    let mut controller = controller_with_list("45").await;
    run(&mut controller, &["1"]).await;

    let outcomes = run(&mut controller, &["yes", "300000", "old"]).await;
    assert_eq!(outcomes[2].stage, DialogueStage::ShowingRecommendations);
    assert_eq!(controller.state().recommendations().len(), 3);
}

#[tokio::test]
async fn test_exit_while_collecting() {
    let mut controller = controller();
    let outcomes = run(&mut controller, &["yes", "quit"]).await;
    assert_eq!(outcomes[1].replies, vec![copy().goodbye]);
    assert!(outcomes[1].is_ended());
}

#[tokio::test]
async fn test_exit_at_drill_down_prompt() {
    let mut controller = controller_with_list("30").await;
    let outcome = controller.handle("exit").await;
    assert_eq!(outcome.stage, DialogueStage::Ended);
}

#[tokio::test]
async fn test_deny_ends_session() {
    let mut controller = controller();
    let outcome = controller.handle("nope").await;
    assert_eq!(
        outcome.replies,
        vec!["Alright! If you need any assistance, feel free to ask."]
    );
    assert_eq!(outcome.stage, DialogueStage::Ended);

    // nothing happens after the end
    let outcome = controller.handle("hello").await;
    assert!(outcome.replies.is_empty());
    assert_eq!(outcome.intent, None);
    assert_eq!(outcome.stage, DialogueStage::Ended);
}

#[tokio::test]
async fn test_help_and_unknown_keep_stage() {
    let mut controller = controller_with_list("45").await;
    run(&mut controller, &["1"]).await;
    let copy = copy();

    let outcome = controller.handle("help").await;
    assert_eq!(outcome.replies, vec![copy.help.clone()]);
    assert_eq!(outcome.stage, DialogueStage::ShowingRecommendations);

    let outcome = controller.handle("what about gold?").await;
    assert_eq!(outcome.replies, vec![copy.clarify.clone()]);
    assert_eq!(outcome.stage, DialogueStage::ShowingRecommendations);
}

#[tokio::test]
async fn test_more_info_with_extractive_qa() {
    let mut controller = controller();
    let outcome = controller
        .handle("I want more information. Which tax-saving schemes suit me?")
        .await;
    assert_eq!(outcome.intent, Some(IntentLabel::MoreInfo));
    assert_eq!(outcome.replies, vec!["Which tax-saving schemes suit me?"]);
    assert!(outcome.error.is_none());
}

#[tokio::test]
async fn test_qa_timeout_is_recovered() {
    let config = DialogueConfig {
        qa_timeout: Duration::from_millis(50),
        ..Default::default()
    };
    let mut controller = controller_with(TaxCatalog::builtin().unwrap(), Arc::new(SlowQa), config);

    let outcome = controller.handle("more details please").await;
    assert_eq!(outcome.replies, vec![copy().qa_unavailable]);
    assert!(matches!(outcome.error, Some(Error::QaUnavailable(_))));
    assert_eq!(outcome.stage, DialogueStage::Start);
    assert!(!controller.is_ended());
}

#[tokio::test]
async fn test_qa_failure_is_recovered() {
    let mut controller = controller_with(
        TaxCatalog::builtin().unwrap(),
        Arc::new(BrokenQa),
        DialogueConfig::default(),
    );
    let outcome = controller.handle("more").await;
    assert!(matches!(outcome.error, Some(Error::QaUnavailable(_))));

    let outcome = controller.handle("yes").await;
    assert_eq!(outcome.stage, DialogueStage::AwaitIncomeAge);
}

#[tokio::test]
async fn test_no_applicable_schemes() {
    let yaml = r#"
schemes:
  - section: Section 80D
    description: Deductions on health insurance premiums
    limit: 25000
    investments:
      - name: Health Insurance
        description: Premium paid for health insurance
        benefit: Deduction based on age group
        application_steps: [Buy a policy]
        application_link: https://www.policybazaar.com/health-insurance/
eligibility:
  - section: Section 80D
    max_age: 60
"#;
    let mut controller = controller_with(
        TaxCatalog::from_yaml_str(yaml).unwrap(),
        Arc::new(ExtractiveQa::new()),
        DialogueConfig::default(),
    );

    let outcomes = run(&mut controller, &["yes", "200000", "70"]).await;
    assert_eq!(
        outcomes[2].replies,
        vec![
            "Based on your income of INR 200000, you fall under the 'No Tax'.".to_string(),
            copy().no_schemes,
        ]
    );
    assert_eq!(outcomes[2].stage, DialogueStage::AwaitConsent);
}
