//! Tax Saving Assistant entry point

use anyhow::Context;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use tax_assistant_agent::{DialogueConfig, DialogueController};
use tax_assistant_cli::run_session;
use tax_assistant_config::{load_settings, Settings, TaxCatalog};
use tax_assistant_llm::create_qa_service;
use tax_assistant_text_processing::KeywordIntentClassifier;
use tax_assistant_tools::EligibilityEngine;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
    let env = std::env::var("TAX_ASSISTANT_ENV").ok();
    let config = match load_settings(env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };

    init_tracing(&config);

    tracing::info!("Starting Tax Saving Assistant v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_env = env.as_deref().unwrap_or("default"),
        qa_provider = ?config.qa.provider,
        "Configuration loaded"
    );

    let catalog = match TaxCatalog::load_or_builtin(config.assistant.catalog_path.as_deref()) {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load tax catalog");
            return Err(tax_assistant_core::Error::from(e).into());
        }
    };
    tracing::info!(schemes = catalog.len(), "Tax catalog ready");

    let classifier = Arc::new(KeywordIntentClassifier::new(&config.intents));
    let qa = create_qa_service(&config.qa).context("Failed to create QA service")?;

    let mut controller = DialogueController::new(
        EligibilityEngine::new(catalog),
        classifier,
        qa,
        DialogueConfig::from_settings(&config),
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let end = run_session(
        &mut controller,
        stdin,
        &mut stdout,
        config.assistant.idle_timeout(),
    )
    .await
    .context("Terminal I/O failed")?;

    tracing::info!(?end, "Session finished");
    Ok(())
}

/// Logs go to stderr so the transcript on stdout stays clean
fn init_tracing(config: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.observability.log_level;
        format!("tax_assistant={}", level).into()
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if config.observability.log_json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };
    subscriber.with(fmt_layer).init();
}
