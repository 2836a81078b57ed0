//! Session setup: completion provider, iteration log and session context.

use crate::config::Config;
use crate::error::Result;
use crate::session::Coordinator;
use lexcite_extractor::build_system_prompt;
use lexcite_llm::{JsonlIterationLog, OllamaProvider};
use lexcite_worker::{IngestOutcome, SessionContext};
use std::sync::Arc;
use tracing::info;

/// Ollama completion provider with the composed system prompt.
pub fn build_completion_provider(
    config: &Config,
    extraction_enabled: bool,
    log: Option<Arc<JsonlIterationLog>>,
) -> OllamaProvider {
    let system_prompt = build_system_prompt(
        extraction_enabled,
        config.completion.custom_instructions.as_deref(),
        &config.completion.base_prompt,
    );

    let mut provider = OllamaProvider::new(&config.completion.endpoint, &config.completion.model)
        .with_max_retries(config.completion.max_retries)
        .with_system_prompt(system_prompt);
    if let Some(log) = log {
        provider = provider.with_iteration_log(log);
    }
    provider
}

/// Open a query session over `outcome`.
pub fn open_session(
    coordinator: &mut Coordinator<OllamaProvider>,
    outcome: &IngestOutcome,
    config: &Config,
    show_log: bool,
) -> Result<()> {
    let log = match config.log_dir(show_log)? {
        Some(dir) => {
            std::fs::create_dir_all(&dir)?;
            let log = JsonlIterationLog::create(&dir, "ollama", &config.completion.model)?;
            info!("Iteration log: {}", log.path().display());
            Some(Arc::new(log))
        }
        None => None,
    };

    let extraction_enabled = !outcome.extraction_results.is_empty();
    let provider = build_completion_provider(config, extraction_enabled, log.clone());

    let mut session = SessionContext::from_ingest(Arc::new(provider), outcome);
    if let Some(log) = log {
        session = session.with_logger(log);
    }
    coordinator.open_session(session);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexcite_domain::Document;
    use lexcite_worker::WorkerConfig;
    use tempfile::TempDir;

    #[test]
    fn test_provider_uses_completion_model() {
        let mut config = Config::default();
        config.completion.model = "qwen2".to_string();
        let provider = build_completion_provider(&config, true, None);
        assert_eq!(provider.model(), "qwen2");
    }

    #[test]
    fn test_open_session_with_log() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.completion.log_dir = Some(dir.path().join("logs"));

        let outcome = IngestOutcome {
            documents: vec![Document::new("a.txt", "Alpha")],
            context: "ctx".to_string(),
            warnings: vec![],
            extraction_results: vec![],
        };
        let mut coordinator = Coordinator::new(&WorkerConfig::default());
        open_session(&mut coordinator, &outcome, &config, false).unwrap();

        let session = coordinator.session().unwrap();
        assert_eq!(session.context(), "ctx");
        assert_eq!(std::fs::read_dir(dir.path().join("logs")).unwrap().count(), 1);
    }
}
