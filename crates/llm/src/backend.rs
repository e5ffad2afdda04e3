//! HTTP question-answering backend
//!
//! Talks to an extractive QA inference endpoint (Hugging Face style):
//! request `{"inputs": {"question", "context"}}`, response
//! `{"answer", "score", ...}`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use tax_assistant_config::QaConfig;
use tax_assistant_core::{ContextQa, Result};

use crate::LlmError;

/// HTTP backend configuration
#[derive(Debug, Clone)]
pub struct HttpQaConfig {
    /// Inference endpoint URL
    pub endpoint: String,
    /// Optional bearer token
    pub api_key: Option<String>,
    /// Request timeout
    pub timeout: Duration,
}

impl HttpQaConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            timeout: Duration::from_secs(5),
        }
    }

    pub fn from_settings(config: &QaConfig) -> std::result::Result<Self, LlmError> {
        let endpoint = config
            .endpoint
            .clone()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| LlmError::Configuration("qa.endpoint is not set".to_string()))?;
        Ok(Self {
            endpoint,
            api_key: config.api_key.clone(),
            timeout: config.timeout(),
        })
    }
}

#[derive(Debug, Serialize)]
struct QaRequest<'a> {
    inputs: QaInputs<'a>,
}

#[derive(Debug, Serialize)]
struct QaInputs<'a> {
    question: &'a str,
    context: &'a str,
}

#[derive(Debug, Deserialize)]
struct QaResponse {
    answer: String,
    #[serde(default)]
    score: Option<f64>,
}

pub struct HttpQaBackend {
    client: Client,
    config: HttpQaConfig,
}

impl HttpQaBackend {
    pub fn new(config: HttpQaConfig) -> std::result::Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    async fn execute_request(
        &self,
        question: &str,
        context: &str,
    ) -> std::result::Result<QaResponse, LlmError> {
        let request = QaRequest {
            inputs: QaInputs { question, context },
        };

        let mut builder = self.client.post(&self.config.endpoint).json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {}: {}", status, error_text)));
        }

        response
            .json::<QaResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ContextQa for HttpQaBackend {
    async fn answer(&self, question: &str, context: &str) -> Result<String> {
        let response = self.execute_request(question, context).await?;

        let answer = response.answer.trim();
        if answer.is_empty() {
            return Err(LlmError::NoAnswer("endpoint returned an empty answer".to_string()).into());
        }

        tracing::debug!(score = ?response.score, "QA endpoint answered");
        Ok(answer.to_string())
    }

    fn name(&self) -> &str {
        "http"
    }
}
