//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Extraction cache could not be opened
    #[error("Cache error: {0}")]
    Cache(#[from] lexcite_store::CacheError),

    /// Language model setup failed
    #[error("LLM error: {0}")]
    Llm(#[from] lexcite_llm::LlmError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Ingestion produced no usable documents
    #[error("{0}")]
    Ingest(String),

    /// A task ended without posting its result
    #[error("Background task ended unexpectedly: {0}")]
    TaskLost(String),

    /// Line editor failure
    #[error("Editor error: {0}")]
    Editor(String),
}
