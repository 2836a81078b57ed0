//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
///
/// The engine never returns these to its callers; they are rendered into
/// `ExtractionResult::error` for the document that failed.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Schema is not registered
    #[error("Unknown schema: '{name}'. Available: {available}")]
    UnknownSchema {
        /// Requested schema name
        name: String,
        /// Comma-separated registered names
        available: String,
    },

    /// Extraction provider error
    #[error("Provider error: {0}")]
    Provider(String),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Invalid span format in LLM response
    #[error("Invalid extraction format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::JsonParse(e.to_string())
    }
}
