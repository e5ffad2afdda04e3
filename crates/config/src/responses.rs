//! User-facing copy
//!
//! Fixed replies of the assistant. Replies that embed data (bracket
//! statement, scheme list, scheme details) are composed by the agent crate.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseTemplates {
    /// First line of every session
    pub opening: String,
    pub greeting: String,
    pub ask_income: String,
    pub ask_age: String,
    pub invalid_income_age: String,
    pub recommendations_header: String,
    pub no_schemes: String,
    pub drill_down_prompt: String,
    pub invalid_choice: String,
    pub invalid_number: String,
    /// Reply to "no" at the drill-down prompt
    pub drill_down_declined: String,
    pub deny: String,
    pub goodbye: String,
    pub help: String,
    pub clarify: String,
    pub qa_unavailable: String,
}

impl Default for ResponseTemplates {
    fn default() -> Self {
        Self {
            opening: "Hello! I'm your Tax Saving Assistant. How can I assist you today?".into(),
            greeting: "Hi there! I can help you with tax-saving schemes. Would you like to know about them?".into(),
            ask_income: "Great! Can you please provide your annual income (in INR)?".into(),
            ask_age: "And your age?".into(),
            invalid_income_age: "Invalid input. Please enter numeric values for income and age."
                .into(),
            recommendations_header: "Here are some tax-saving schemes that you can consider:"
                .into(),
            no_schemes:
                "No applicable tax-saving schemes found based on the provided information.".into(),
            drill_down_prompt:
                "Would you like to explore details of any scheme? (Enter the number or 'no' to skip)"
                    .into(),
            invalid_choice: "Invalid choice. Please try again.".into(),
            invalid_number: "Invalid input. Please enter a valid number.".into(),
            drill_down_declined:
                "Alright! Say 'yes' whenever you want to look at schemes again.".into(),
            deny: "Alright! If you need any assistance, feel free to ask.".into(),
            goodbye: "Goodbye! Have a great day!".into(),
            help: "I can assist you with information on tax-saving schemes. Let me know what you need help with!".into(),
            clarify: "I'm not sure how to respond to that. Can you please rephrase or ask something else?".into(),
            qa_unavailable:
                "Sorry, I couldn't find more details right now. Please try again later.".into(),
        }
    }
}

impl ResponseTemplates {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("opening", &self.opening),
            ("greeting", &self.greeting),
            ("ask_income", &self.ask_income),
            ("ask_age", &self.ask_age),
            ("goodbye", &self.goodbye),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::invalid(
                    format!("responses.{}", name),
                    "must not be blank",
                ));
            }
        }
        Ok(())
    }
}
