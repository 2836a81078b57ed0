//! Query task: one completion call plus citation enrichment

use crate::blocking::{run_blocking, BlockingFailure};
use crate::channel::ResultSender;
use crate::error::WorkerError;
use crate::message::{IngestOutcome, LogRange, QueryOutcome, WorkResult};
use lexcite_domain::{CompletionProvider, ExtractionResult, IterationLogger};
use lexcite_verifier::CitationVerifier;
use std::fmt::Display;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Everything a query needs from its session, captured at submission time
///
/// Cloning is cheap; all fields are shared.
pub struct SessionContext<C> {
    provider: Arc<C>,
    context: Arc<str>,
    extraction_results: Arc<Vec<ExtractionResult>>,
    verifier: Option<Arc<CitationVerifier>>,
    logger: Option<Arc<dyn IterationLogger>>,
}

impl<C> Clone for SessionContext<C> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            context: Arc::clone(&self.context),
            extraction_results: Arc::clone(&self.extraction_results),
            verifier: self.verifier.clone(),
            logger: self.logger.clone(),
        }
    }
}

impl<C> SessionContext<C> {
    /// Session over `context` answered by `provider`, without citation checks
    pub fn new(provider: Arc<C>, context: impl Into<Arc<str>>) -> Self {
        Self {
            provider,
            context: context.into(),
            extraction_results: Arc::new(Vec::new()),
            verifier: None,
            logger: None,
        }
    }

    /// Session built from a finished ingestion
    pub fn from_ingest(provider: Arc<C>, outcome: &IngestOutcome) -> Self {
        Self::new(provider, outcome.context.as_str())
            .with_extraction_results(outcome.extraction_results.clone())
    }

    /// Verify citations against `results`; an empty set disables verification
    pub fn with_extraction_results(mut self, results: Vec<ExtractionResult>) -> Self {
        self.verifier = if results.is_empty() {
            None
        } else {
            Some(Arc::new(CitationVerifier::new(&results)))
        };
        self.extraction_results = Arc::new(results);
        self
    }

    /// Read iteration counts from `logger` around each query
    pub fn with_logger(mut self, logger: Arc<dyn IterationLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Combined context sent with every question
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Extraction results citations are checked against
    pub fn extraction_results(&self) -> &[ExtractionResult] {
        &self.extraction_results
    }

    /// The completion provider
    pub fn provider(&self) -> &Arc<C> {
        &self.provider
    }
}

/// Asks one question and posts one `query_done` or `query_error`
///
/// The session's provider must not serve two queries at once; callers submit
/// the next query only after the previous one has posted its message.
pub struct QueryTask<C> {
    question: String,
    session: SessionContext<C>,
    timeout: Option<Duration>,
}

impl<C> QueryTask<C>
where
    C: CompletionProvider + Send + Sync + 'static,
    C::Error: Display,
{
    /// Ask `question` in `session`
    pub fn new(question: impl Into<String>, session: SessionContext<C>) -> Self {
        Self {
            question: question.into(),
            session,
            timeout: None,
        }
    }

    /// Bound the completion call; a miss posts `query_error`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run on the current runtime and post the outcome to `results`
    pub fn spawn(self, results: &ResultSender) -> JoinHandle<()> {
        let results = results.clone();
        tokio::spawn(async move {
            results.send(self.run().await);
        })
    }

    /// Run to completion and return the terminal message
    pub async fn run(self) -> WorkResult {
        let query = self.question.clone();
        match self.execute().await {
            Ok(outcome) => WorkResult::QueryDone(outcome),
            Err(e) => {
                warn!("{}", e);
                WorkResult::QueryError {
                    query,
                    message: e.to_string(),
                }
            }
        }
    }

    async fn execute(self) -> Result<QueryOutcome, WorkerError> {
        let SessionContext {
            provider,
            context,
            verifier,
            logger,
            ..
        } = self.session;

        let start_iteration = logger.as_ref().map_or(0, |l| l.iteration_count());
        let started = Instant::now();
        info!("Running query ({} chars of context)", context.len());

        let question = self.question.clone();
        let call = move || provider.complete(&context, &question).map_err(|e| e.to_string());
        let response = match run_blocking(call, self.timeout).await {
            Ok(Ok(response)) => response,
            Ok(Err(message)) => return Err(WorkerError::Provider(message)),
            Err(BlockingFailure::TimedOut(limit)) => return Err(WorkerError::Timeout(limit)),
            Err(BlockingFailure::Panicked(message)) => {
                return Err(WorkerError::Provider(format!("provider panicked: {}", message)))
            }
        };
        info!("Query answered in {:?} ({} chars)", started.elapsed(), response.len());

        let log_range = logger.as_ref().map(|l| LogRange {
            path: l.log_file_path(),
            start: start_iteration,
            end: l.iteration_count(),
        });

        let enriched = verifier.map(|v| v.enrich(&response));

        Ok(QueryOutcome {
            query: self.question,
            response,
            enriched,
            log_range,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexcite_domain::ExtractionRecord;
    use lexcite_llm::MockProvider;

    #[test]
    fn test_session_without_results_has_no_verifier() {
        let session = SessionContext::new(Arc::new(MockProvider::default()), "ctx")
            .with_extraction_results(vec![]);
        assert!(session.verifier.is_none());
        assert_eq!(session.context(), "ctx");
    }

    #[test]
    fn test_session_clone_shares_state() {
        let results = vec![ExtractionResult::success(
            "a.txt",
            vec![ExtractionRecord::new("party", "Acme", 0, 4)],
        )];
        let session = SessionContext::new(Arc::new(MockProvider::default()), "ctx")
            .with_extraction_results(results);
        let clone = session.clone();

        assert!(Arc::ptr_eq(session.provider(), clone.provider()));
        assert_eq!(clone.extraction_results().len(), 1);
        assert!(clone.verifier.is_some());
    }

    #[tokio::test]
    async fn test_provider_panic_becomes_query_error() {
        struct Panicking;

        impl CompletionProvider for Panicking {
            type Error = String;

            fn complete(&self, _context: &str, _question: &str) -> Result<String, String> {
                panic!("backend state corrupted")
            }
        }

        let session = SessionContext::new(Arc::new(Panicking), "ctx");
        let result = QueryTask::new("Who?", session).run().await;

        match result {
            WorkResult::QueryError { query, message } => {
                assert_eq!(query, "Who?");
                assert!(message.contains("backend state corrupted"));
            }
            other => panic!("expected query_error, got {}", other.kind()),
        }
    }
}
