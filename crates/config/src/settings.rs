//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::{ConfigError, IntentKeywordsConfig, ResponseTemplates};

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Dialogue configuration
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Context QA service
    #[serde(default)]
    pub qa: QaConfig,

    /// Intent keyword sets
    #[serde(default)]
    pub intents: IntentKeywordsConfig,

    /// User-facing copy
    #[serde(default)]
    pub responses: ResponseTemplates,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.assistant.qa_question.trim().is_empty() {
            return Err(ConfigError::invalid(
                "assistant.qa_question",
                "must not be blank",
            ));
        }

        if self.assistant.idle_timeout_secs == Some(0) {
            return Err(ConfigError::invalid(
                "assistant.idle_timeout_secs",
                "must be greater than zero when set",
            ));
        }

        if self.qa.timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "qa.timeout_ms",
                "must be greater than zero",
            ));
        }

        if self.qa.provider == QaProvider::Http
            && self.qa.endpoint.as_deref().map_or(true, |e| e.trim().is_empty())
        {
            return Err(ConfigError::invalid(
                "qa.endpoint",
                "required when qa.provider is http",
            ));
        }

        self.intents.validate()?;
        self.responses.validate()?;

        Ok(())
    }
}

/// Dialogue configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// YAML catalog replacing the built-in one
    #[serde(default)]
    pub catalog_path: Option<String>,

    /// End the session after this long without input
    #[serde(default)]
    pub idle_timeout_secs: Option<u64>,

    /// Question put to the QA service for more-info requests
    #[serde(default = "default_qa_question")]
    pub qa_question: String,
}

fn default_qa_question() -> String {
    "Tell me more about tax-saving schemes?".to_string()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            idle_timeout_secs: None,
            qa_question: default_qa_question(),
        }
    }
}

impl AssistantConfig {
    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_secs.map(Duration::from_secs)
    }
}

/// Which context QA implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QaProvider {
    /// In-process sentence extraction
    #[default]
    Extractive,
    /// Remote question-answering inference endpoint
    Http,
}

/// Context QA configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaConfig {
    #[serde(default)]
    pub provider: QaProvider,

    /// Inference endpoint URL (http provider)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Bearer token for the endpoint
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_qa_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_qa_timeout_ms() -> u64 {
    5000
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            provider: QaProvider::default(),
            endpoint: None,
            api_key: None,
            timeout_ms: default_qa_timeout_ms(),
        }
    }
}

impl QaConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

/// Load settings from `config/` and the environment
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Load settings from a configuration directory
///
/// Sources, later ones overriding earlier ones:
/// `{dir}/default`, `{dir}/{env}`, then `TAX_ASSISTANT__*` variables.
pub fn load_settings_from(dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    // Load default config
    let default_path = dir.join("default");
    builder = builder.add_source(File::with_name(&default_path.to_string_lossy()).required(false));

    // Load environment-specific config
    if let Some(env_name) = env {
        let env_path = dir.join(env_name);
        builder = builder.add_source(File::with_name(&env_path.to_string_lossy()).required(false));
    }

    // Load from environment variables
    builder = builder.add_source(
        Environment::with_prefix("TAX_ASSISTANT")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}
