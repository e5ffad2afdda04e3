//! Context question answering trait

use async_trait::async_trait;

use crate::Result;

/// Answers a question from free-form context text
///
/// # Errors
/// Returns `Error::QaUnavailable` when no answer can be produced. Callers
/// degrade to an apologetic reply; the failure never ends a session.
#[async_trait]
pub trait ContextQa: Send + Sync {
    async fn answer(&self, question: &str, context: &str) -> Result<String>;

    /// Backend name for logging
    fn name(&self) -> &str;
}
