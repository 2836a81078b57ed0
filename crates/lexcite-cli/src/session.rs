//! Session coordinator: submits tasks and polls their results.

use crate::error::{CliError, Result};
use lexcite_domain::CompletionProvider;
use lexcite_worker::{
    result_channel, IngestOutcome, IngestTask, QueryOutcome, QueryTask, ResultReceiver, ResultSender,
    SessionContext, WorkResult, WorkerConfig,
};
use std::collections::VecDeque;
use std::fmt::Display;
use std::time::Duration;
use tracing::debug;

/// Drives one ingestion and the queries against it.
///
/// `ask` borrows the coordinator mutably until its query has posted, so a
/// session never has two queries in flight.
pub struct Coordinator<C> {
    sender: ResultSender,
    results: ResultReceiver,
    pending: VecDeque<WorkResult>,
    poll_interval: Duration,
    timeout: Option<Duration>,
    session: Option<SessionContext<C>>,
}

impl<C> Coordinator<C>
where
    C: CompletionProvider + Send + Sync + 'static,
    C::Error: Display,
{
    /// Create a coordinator with its own result channel.
    pub fn new(config: &WorkerConfig) -> Self {
        let (sender, results) = result_channel();
        Self {
            sender,
            results,
            pending: VecDeque::new(),
            poll_interval: config.poll_interval(),
            timeout: config.provider_timeout(),
            session: None,
        }
    }

    /// Run `task` and wait for its outcome.
    pub async fn ingest(&mut self, task: IngestTask) -> Result<IngestOutcome> {
        task.with_timeout(self.timeout).spawn(&self.sender);

        match self.next_result().await? {
            WorkResult::IngestDone(outcome) => Ok(outcome),
            WorkResult::IngestError { message } => Err(CliError::Ingest(message)),
            other => Err(CliError::TaskLost(format!("unexpected {} during ingestion", other.kind()))),
        }
    }

    /// Make `session` the target of subsequent questions.
    pub fn open_session(&mut self, session: SessionContext<C>) {
        self.session = Some(session);
    }

    /// The open session, if any.
    pub fn session(&self) -> Option<&SessionContext<C>> {
        self.session.as_ref()
    }

    /// Ask `question` and wait for the answer.
    ///
    /// A provider failure is returned as `Ok(Err(message))`: the session stays
    /// usable for the next question.
    pub async fn ask(&mut self, question: &str) -> Result<std::result::Result<QueryOutcome, String>> {
        let session = self
            .session
            .clone()
            .ok_or_else(|| CliError::InvalidInput("No documents loaded".to_string()))?;

        QueryTask::new(question, session)
            .with_timeout(self.timeout)
            .spawn(&self.sender);

        match self.next_result().await? {
            WorkResult::QueryDone(outcome) => Ok(Ok(outcome)),
            WorkResult::QueryError { message, .. } => Ok(Err(message)),
            other => Err(CliError::TaskLost(format!("unexpected {} during query", other.kind()))),
        }
    }

    async fn next_result(&mut self) -> Result<WorkResult> {
        loop {
            if let Some(result) = self.pending.pop_front() {
                return Ok(result);
            }
            let batch = self.results.poll(self.poll_interval).await;
            if batch.is_empty() {
                return Err(CliError::TaskLost("result channel closed".to_string()));
            }
            debug!("Received {} result(s)", batch.len());
            self.pending.extend(batch);
        }
    }
}
