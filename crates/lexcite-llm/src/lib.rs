//! Lexcite LLM Provider Layer
//!
//! Pluggable implementations of the provider traits from `lexcite-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: deterministic text generation and completion for tests
//! - `MockExtractionProvider`: deterministic span extraction for tests
//! - `OllamaProvider`: local Ollama API integration
//!
//! # Iteration log
//!
//! `JsonlIterationLog` records one JSON line per completion call so that a
//! query's iterations can be pulled back out by range afterwards.
//!
//! # Examples
//!
//! ```
//! use lexcite_llm::MockProvider;
//! use lexcite_domain::traits::{CompletionProvider, LlmProvider};
//!
//! let provider = MockProvider::new("Acme is the buyer.");
//! assert_eq!(provider.generate("extraction prompt").unwrap(), "Acme is the buyer.");
//! assert_eq!(provider.complete("context", "Who buys?").unwrap(), "Acme is the buyer.");
//! ```

#![warn(missing_docs)]

pub mod log;
pub mod mock_extraction;
pub mod ollama;

use lexcite_domain::traits::{CompletionProvider, LlmProvider as LlmProviderTrait};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use thiserror::Error;

pub use log::{format_log_entries, read_log_range, JsonlIterationLog, LogEntry};
pub use mock_extraction::MockExtractionProvider;
pub use ollama::OllamaProvider;

/// Provider and iteration log errors
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Iteration log could not be read or written
    #[error("Log error: {0}")]
    Log(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Error(String),
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
/// As a [`CompletionProvider`] it looks responses up by question; as an
/// [`LlmProviderTrait`] it looks them up by prompt.
///
/// # Examples
///
/// ```
/// use lexcite_llm::MockProvider;
/// use lexcite_domain::traits::LlmProvider;
///
/// let mut provider = MockProvider::new("I could not find that.");
/// provider.add_response("Who is the buyer?", "Acme Corporation");
/// provider.add_error("What is the cap?", "rate limited");
///
/// assert_eq!(provider.generate("Who is the buyer?").unwrap(), "Acme Corporation");
/// assert_eq!(provider.generate("Anything else?").unwrap(), "I could not find that.");
/// assert!(provider.generate("What is the cap?").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_reply: Reply,
    replies: Arc<Mutex<HashMap<String, Reply>>>,
    call_count: Arc<Mutex<usize>>,
    delay: Option<Duration>,
    log: Option<Arc<JsonlIterationLog>>,
}

impl MockProvider {
    /// Answer every prompt and question with `response`
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_reply: Reply::Text(response.into()),
            replies: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
            delay: None,
            log: None,
        }
    }

    /// Create a MockProvider that fails every call with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            default_reply: Reply::Error(message.into()),
            ..Self::default()
        }
    }

    /// Sleep for `delay` before answering (for deadline tests)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Record every call as an iteration in `log`
    pub fn with_iteration_log(mut self, log: Arc<JsonlIterationLog>) -> Self {
        self.log = Some(log);
        self
    }

    /// Add a specific response for a given prompt or question
    pub fn add_response(&mut self, key: impl Into<String>, response: impl Into<String>) {
        self.replies
            .lock()
            .unwrap()
            .insert(key.into(), Reply::Text(response.into()));
    }

    /// Configure to return an error for a specific prompt or question
    pub fn add_error(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.replies
            .lock()
            .unwrap()
            .insert(key.into(), Reply::Error(message.into()));
    }

    /// Get the number of calls made so far
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap() = 0;
    }

    fn answer(&self, key: &str) -> Result<String, LlmError> {
        let started = Instant::now();
        *self.call_count.lock().unwrap() += 1;

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .unwrap_or_else(|| self.default_reply.clone());

        match reply {
            Reply::Text(text) => {
                if let Some(log) = &self.log {
                    log.record(&text, started.elapsed())?;
                }
                Ok(text)
            }
            Reply::Error(message) => Err(LlmError::Other(message)),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.answer(prompt)
    }
}

impl CompletionProvider for MockProvider {
    type Error = LlmError;

    fn complete(&self, _context: &str, question: &str) -> Result<String, Self::Error> {
        self.answer(question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexcite_domain::traits::IterationLogger;

    #[test]
    fn test_fixed_reply_for_every_prompt() {
        let provider = MockProvider::new("[]");
        assert_eq!(provider.generate("Extract parties from: ...").unwrap(), "[]");
        assert_eq!(provider.generate("Extract dates from: ...").unwrap(), "[]");
    }

    #[test]
    fn test_reply_lookup_falls_back_to_default() {
        let mut provider = MockProvider::new("No answer in the documents.");
        provider.add_response("Who is the buyer?", "Acme [Source: contract.pdf, chars 0-4]");

        assert_eq!(
            provider.complete("context", "Who is the buyer?").unwrap(),
            "Acme [Source: contract.pdf, chars 0-4]"
        );
        assert_eq!(
            provider.complete("context", "Who is the seller?").unwrap(),
            "No answer in the documents."
        );
    }

    #[test]
    fn test_completion_keys_on_question_not_context() {
        let mut provider = MockProvider::default();
        provider.add_response("context", "wrong");
        provider.add_response("Governing law?", "England");
        assert_eq!(provider.complete("context", "Governing law?").unwrap(), "England");
    }

    #[test]
    fn test_counts_both_traits_and_resets() {
        let provider = MockProvider::new("ok");
        provider.generate("extract").unwrap();
        provider.complete("ctx", "q").unwrap();
        assert_eq!(provider.call_count(), 2);

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_errors_count_as_calls() {
        let mut provider = MockProvider::default();
        provider.add_error("Notice period?", "quota exceeded");

        let err = provider.complete("ctx", "Notice period?").unwrap_err();
        assert!(matches!(err, LlmError::Other(ref m) if m == "quota exceeded"));
        assert_eq!(provider.call_count(), 1);
    }

    #[test]
    fn test_failing_provider() {
        let provider = MockProvider::failing("backend down");
        let err = provider.complete("ctx", "q").unwrap_err();
        assert!(err.to_string().contains("backend down"));
    }

    #[test]
    fn test_clones_share_replies_and_counter() {
        let mut original = MockProvider::default();
        let shared = original.clone();
        original.add_response("q", "added after clone");

        assert_eq!(shared.complete("ctx", "q").unwrap(), "added after clone");
        assert_eq!(original.call_count(), 1);
    }

    #[test]
    fn test_calls_are_logged_as_iterations() {
        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(JsonlIterationLog::create(dir.path(), "mock", "mock-model").unwrap());
        let provider = MockProvider::new("answer").with_iteration_log(Arc::clone(&log));

        provider.complete("ctx", "q1").unwrap();
        provider.complete("ctx", "q2").unwrap();
        assert_eq!(log.iteration_count(), 2);
    }

    #[test]
    fn test_errors_are_not_logged() {
        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(JsonlIterationLog::create(dir.path(), "mock", "mock-model").unwrap());
        let provider = MockProvider::failing("down").with_iteration_log(Arc::clone(&log));

        assert!(provider.complete("ctx", "q").is_err());
        assert_eq!(log.iteration_count(), 0);
    }
}
