//! Text processing for the tax saving assistant
//!
//! This crate provides:
//! - **Intent Classification**: keyword matching with a fixed precedence
//! - **Input Parsing**: income, age and list choices typed as free text
//! - **Sentence Segmentation**: context preparation for the QA service

pub mod classifier;
pub mod numbers;
pub mod sentences;

pub use classifier::KeywordIntentClassifier;
pub use numbers::{parse_age, parse_choice, parse_income};
pub use sentences::{join_sentences, split_sentences};
