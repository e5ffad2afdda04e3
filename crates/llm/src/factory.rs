//! QA service factory
//!
//! Builds the configured [`ContextQa`] implementation.

use std::sync::Arc;

use tax_assistant_config::{QaConfig, QaProvider};
use tax_assistant_core::ContextQa;

use crate::{ExtractiveQa, HttpQaBackend, HttpQaConfig, LlmError};

pub fn create_qa_service(config: &QaConfig) -> Result<Arc<dyn ContextQa>, LlmError> {
    let service: Arc<dyn ContextQa> = match config.provider {
        QaProvider::Extractive => Arc::new(ExtractiveQa::new()),
        QaProvider::Http => Arc::new(HttpQaBackend::new(HttpQaConfig::from_settings(config)?)?),
    };

    tracing::info!(provider = service.name(), "Created QA service");
    Ok(service)
}
