//! Error types shared across the assistant

use thiserror::Error;

/// Result alias using the assistant-wide [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Assistant errors
///
/// Only `CatalogLoad` is fatal, and only at startup. The other variants are
/// recovered inside the dialogue turn that produced them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Non-numeric or out-of-range income, age or scheme choice
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Malformed reference data
    #[error("Catalog load error: {0}")]
    CatalogLoad(String),

    /// The context QA service could not produce an answer
    #[error("QA service unavailable: {0}")]
    QaUnavailable(String),
}

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn qa_unavailable(message: impl Into<String>) -> Self {
        Self::QaUnavailable(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_input("income must not be negative");
        assert_eq!(err.to_string(), "Invalid input: income must not be negative");
    }
}
