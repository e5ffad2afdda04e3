//! Core traits and types for the tax saving assistant
//!
//! This crate provides foundational types used across all other crates:
//! - Error taxonomy shared by every component
//! - Tax catalog data model (schemes, investment options, eligibility rules)
//! - Intent labels and their precedence
//! - Dialogue stages and their allowed transitions
//! - Traits for the external collaborators (intent classifier, context QA)

pub mod catalog;
pub mod conversation;
pub mod error;
pub mod intent;
pub mod traits;

pub use catalog::{
    AgeLimit, DeductionLimit, EligibilityRule, IncomeLimit, InvestmentOption, Scheme, TaxBracket,
};
pub use conversation::DialogueStage;
pub use error::{Error, Result};
pub use intent::IntentLabel;

pub use traits::{ContextQa, IntentClassifier};
