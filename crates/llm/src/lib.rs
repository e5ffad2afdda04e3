//! Context question answering
//!
//! Backends for the assistant's "more information" requests:
//! - **Extractive**: offline, picks the context sentence closest to the question
//! - **HTTP**: remote question-answering inference endpoint

pub mod backend;
pub mod extractive;
pub mod factory;

pub use backend::{HttpQaBackend, HttpQaConfig};
pub use extractive::ExtractiveQa;
pub use factory::create_qa_service;

use thiserror::Error;

/// QA backend errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("No answer: {0}")]
    NoAnswer(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Network(err.to_string())
    }
}

impl From<LlmError> for tax_assistant_core::Error {
    fn from(err: LlmError) -> Self {
        tax_assistant_core::Error::QaUnavailable(err.to_string())
    }
}
