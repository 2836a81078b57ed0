//! Error types for background tasks

use std::time::Duration;
use thiserror::Error;

/// Errors that end a task with a failure message
///
/// The `Display` text is exactly what the task posts on the result channel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    /// Every input file failed or was empty; carries the warning lines
    #[error("No documents could be loaded.\n{0}")]
    NoDocuments(String),

    /// Ingestion stopped unexpectedly (the reading thread panicked)
    #[error("Ingestion failed: {0}")]
    Ingest(String),

    /// The completion provider returned an error or panicked
    #[error("Query failed: {0}")]
    Provider(String),

    /// The completion provider missed its deadline
    #[error("Query failed: provider call timed out after {0:?}")]
    Timeout(Duration),

    /// Invalid worker configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
