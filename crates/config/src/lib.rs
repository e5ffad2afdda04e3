//! Configuration management for the tax saving assistant
//!
//! Supports loading configuration from:
//! - YAML/TOML files under `config/` (`default`, then the environment overlay)
//! - Environment variables (TAX_ASSISTANT__ prefix, `__` as the section separator)
//!
//! The tax catalog (schemes, investment options, eligibility rules) is
//! reference data rather than settings. It ships embedded in the binary and
//! can be replaced by a YAML file named in `assistant.catalog_path`.

pub mod catalog;
pub mod intents;
pub mod responses;
pub mod settings;

pub use catalog::{CatalogError, TaxCatalog};
pub use intents::IntentKeywordsConfig;
pub use responses::ResponseTemplates;
pub use settings::{
    load_settings, load_settings_from, AssistantConfig, ObservabilityConfig, QaConfig,
    QaProvider, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
