//! Terminal messages posted by tasks

use lexcite_domain::{Document, EnrichedResponse, ExtractionResult};
use std::path::PathBuf;

/// The single message a task posts when it finishes
#[derive(Debug, Clone, PartialEq)]
pub enum WorkResult {
    /// Ingestion produced at least one document
    IngestDone(IngestOutcome),

    /// Ingestion produced nothing usable
    IngestError {
        /// Human-readable reason, including the per-file warnings
        message: String,
    },

    /// A query was answered
    QueryDone(QueryOutcome),

    /// A query failed
    QueryError {
        /// The question that was asked
        query: String,
        /// Human-readable reason, including the provider's error text
        message: String,
    },
}

impl WorkResult {
    /// Short tag naming the message kind
    pub fn kind(&self) -> &'static str {
        match self {
            WorkResult::IngestDone(_) => "ingest_done",
            WorkResult::IngestError { .. } => "ingest_error",
            WorkResult::QueryDone(_) => "query_done",
            WorkResult::QueryError { .. } => "query_error",
        }
    }

    /// True for the two failure messages
    pub fn is_error(&self) -> bool {
        matches!(self, WorkResult::IngestError { .. } | WorkResult::QueryError { .. })
    }
}

/// Payload of [`WorkResult::IngestDone`]
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOutcome {
    /// Documents with text, in input order
    pub documents: Vec<Document>,

    /// Combined context handed to the completion provider
    pub context: String,

    /// One line per file that failed, was empty, or had an extraction problem
    pub warnings: Vec<String>,

    /// One result per document when extraction ran, otherwise empty
    pub extraction_results: Vec<ExtractionResult>,
}

/// Payload of [`WorkResult::QueryDone`]
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    /// The question that was asked
    pub query: String,

    /// Raw provider answer
    pub response: String,

    /// Verified citations; `None` when there was nothing to verify against
    pub enriched: Option<EnrichedResponse>,

    /// Iterations this query added to the session log
    pub log_range: Option<LogRange>,
}

/// Slice of an iteration log covering one query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRange {
    /// Log file, when the logger is file-backed
    pub path: Option<PathBuf>,

    /// Iteration count before the call
    pub start: u64,

    /// Iteration count after the call
    pub end: u64,
}

impl LogRange {
    /// Number of iterations in the range
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// True when the query logged nothing
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
