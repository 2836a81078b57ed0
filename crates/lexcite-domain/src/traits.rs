//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the core and the providers it
//! consumes. Implementations live in other crates (`lexcite-llm`,
//! `lexcite-extractor`).

use crate::{ExtractedSpan, FewShotExample};
use std::path::PathBuf;

/// Trait for plain text generation
///
/// Implemented by the infrastructure layer (lexcite-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate text completion for a prompt
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;
}

/// Trait for answering a question against a document context
///
/// This is the language-model backend consumed by query tasks.
pub trait CompletionProvider {
    /// Error type for completion calls
    type Error;

    /// Answer `question` given the combined session `context`
    fn complete(&self, context: &str, question: &str) -> Result<String, Self::Error>;
}

/// Everything an extraction provider needs for one document
#[derive(Debug, Clone, Copy)]
pub struct ExtractionRequest<'a> {
    /// Source text; returned offsets index into this
    pub text: &'a str,

    /// Schema description of what to extract
    pub prompt_description: &'a str,

    /// Schema few-shot examples
    pub examples: &'a [FewShotExample],

    /// Model identifier
    pub model_id: &'a str,

    /// Optional API key for the model backend
    pub api_key: Option<&'a str>,

    /// Number of extraction passes to run
    pub passes: u32,

    /// Maximum characters sent to the model in one call
    pub max_char_buffer: usize,
}

/// Trait for structured span extraction
///
/// Implementations may fail arbitrarily; the extraction engine captures every
/// error on the per-document result.
pub trait ExtractionProvider {
    /// Error type for extraction calls
    type Error;

    /// Extract labeled spans from `request.text`
    fn extract(&self, request: &ExtractionRequest<'_>) -> Result<Vec<ExtractedSpan>, Self::Error>;
}

/// Read-only view of an iteration log owned by a logging collaborator
///
/// The core reads the counter before and after a query to compute the
/// iteration range of that query; it never writes to the log.
pub trait IterationLogger: Send + Sync {
    /// Monotonically increasing number of logged iterations
    fn iteration_count(&self) -> u64;

    /// Location of the log file, if the log is file-backed
    fn log_file_path(&self) -> Option<PathBuf>;
}
