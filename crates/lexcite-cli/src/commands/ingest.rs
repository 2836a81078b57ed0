//! Ingest command implementation.

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::session::Coordinator;
use lexcite_domain::CompletionProvider;
use lexcite_extractor::{ExtractionEngine, LlmSpanExtractor};
use lexcite_llm::OllamaProvider;
use lexcite_store::ExtractionCache;
use lexcite_worker::{ExtractionPlan, IngestOutcome, IngestTask};
use std::fmt::Display;
use std::path::PathBuf;
use std::sync::Arc;

/// Build the ingest task for `files`, with Ollama-backed extraction when enabled.
pub fn build_ingest_task(
    files: Vec<PathBuf>,
    config: &Config,
    cache: Option<Arc<ExtractionCache>>,
) -> Result<IngestTask> {
    let task = IngestTask::new(files);
    if !config.worker.extraction_enabled {
        return Ok(task);
    }

    let schema = config.worker.schema_kind().map_err(CliError::Config)?;
    let provider = OllamaProvider::new(&config.completion.endpoint, &config.extractor.model_id)
        .with_max_retries(config.completion.max_retries);
    let engine = ExtractionEngine::new(LlmSpanExtractor::new(provider));

    let mut plan = ExtractionPlan::new(engine, schema, config.extractor.clone());
    if let Some(cache) = cache {
        plan = plan.with_cache(cache);
    }
    Ok(task.with_extraction(plan))
}

/// Execute the ingest command and print its summary.
pub async fn execute_ingest<C>(
    coordinator: &mut Coordinator<C>,
    task: IngestTask,
    formatter: &Formatter,
) -> Result<IngestOutcome>
where
    C: CompletionProvider + Send + Sync + 'static,
    C::Error: Display,
{
    let outcome = coordinator.ingest(task).await?;
    println!("{}", formatter.ingest_summary(&outcome));
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexcite_llm::MockProvider;
    use lexcite_worker::WorkerConfig;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_ingest_without_extraction() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "Alpha").unwrap();

        let config = Config::default();
        let task = build_ingest_task(vec![path], &config, None).unwrap();
        let mut coordinator: Coordinator<MockProvider> = Coordinator::new(&WorkerConfig::default());

        let outcome = execute_ingest(&mut coordinator, task, &Formatter::new(false)).await.unwrap();
        assert_eq!(outcome.documents.len(), 1);
        assert!(outcome.extraction_results.is_empty());
    }

    #[test]
    fn test_invalid_schema_is_config_error() {
        let mut config = Config::default();
        config.worker.extraction_enabled = true;
        config.worker.schema = "nda".to_string();

        assert!(matches!(
            build_ingest_task(vec![], &config, None),
            Err(CliError::Config(_))
        ));
    }
}
