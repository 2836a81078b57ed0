//! Deterministic extraction provider for tests

use crate::LlmError;
use lexcite_domain::traits::{ExtractionProvider, ExtractionRequest};
use lexcite_domain::ExtractedSpan;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct Pattern {
    class: String,
    needle: String,
    attributes: BTreeMap<String, String>,
}

/// Mock extraction provider
///
/// Emits one span for every occurrence of each registered needle, with
/// correct character offsets, so results line up with the source text the
/// way a real provider's would.
///
/// # Examples
///
/// ```
/// use lexcite_llm::MockExtractionProvider;
/// use lexcite_domain::traits::{ExtractionProvider, ExtractionRequest};
///
/// let provider = MockExtractionProvider::new().with_pattern("party", "Acme");
/// let request = ExtractionRequest {
///     text: "Acme buys from Acme.",
///     prompt_description: "",
///     examples: &[],
///     model_id: "mock",
///     api_key: None,
///     passes: 1,
///     max_char_buffer: 2000,
/// };
/// let spans = provider.extract(&request).unwrap();
/// assert_eq!(spans.len(), 2);
/// assert_eq!((spans[1].char_start, spans[1].char_end), (15, 19));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockExtractionProvider {
    patterns: Vec<Pattern>,
    failures: Vec<(String, String)>,
    call_count: Arc<Mutex<usize>>,
}

impl MockExtractionProvider {
    /// Provider that extracts nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a `class` span wherever `needle` occurs
    pub fn with_pattern(self, class: impl Into<String>, needle: impl Into<String>) -> Self {
        self.with_attributed_pattern(class, needle, [])
    }

    /// Like [`with_pattern`](Self::with_pattern), with attributes on each span
    pub fn with_attributed_pattern<const N: usize>(
        mut self,
        class: impl Into<String>,
        needle: impl Into<String>,
        attributes: [(&str, &str); N],
    ) -> Self {
        self.patterns.push(Pattern {
            class: class.into(),
            needle: needle.into(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
        self
    }

    /// Fail with `message` for any text containing `marker`
    pub fn failing_on(mut self, marker: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures.push((marker.into(), message.into()));
        self
    }

    /// Number of `extract` calls so far
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl ExtractionProvider for MockExtractionProvider {
    type Error = LlmError;

    fn extract(&self, request: &ExtractionRequest<'_>) -> Result<Vec<ExtractedSpan>, Self::Error> {
        *self.call_count.lock().unwrap() += 1;

        if let Some((_, message)) = self
            .failures
            .iter()
            .find(|(marker, _)| request.text.contains(marker.as_str()))
        {
            return Err(LlmError::Other(message.clone()));
        }

        let mut spans = Vec::new();
        for pattern in self.patterns.iter().filter(|p| !p.needle.is_empty()) {
            for (byte_start, matched) in request.text.match_indices(pattern.needle.as_str()) {
                let char_start = request.text[..byte_start].chars().count();
                spans.push(ExtractedSpan {
                    class: pattern.class.clone(),
                    text: matched.to_string(),
                    char_start,
                    char_end: char_start + matched.chars().count(),
                    attributes: pattern.attributes.clone(),
                });
            }
        }
        spans.sort_by_key(|s| (s.char_start, s.char_end));
        Ok(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(text: &str) -> ExtractionRequest<'_> {
        ExtractionRequest {
            text,
            prompt_description: "",
            examples: &[],
            model_id: "mock",
            api_key: None,
            passes: 1,
            max_char_buffer: 2000,
        }
    }

    #[test]
    fn test_offsets_are_character_positions() {
        let provider = MockExtractionProvider::new().with_pattern("party", "Acme");
        let spans = provider.extract(&request("Société Acme")).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!((spans[0].char_start, spans[0].char_end), (8, 12));
    }

    #[test]
    fn test_attributes_are_attached() {
        let provider = MockExtractionProvider::new().with_attributed_pattern(
            "party",
            "Acme",
            [("role", "buyer")],
        );
        let spans = provider.extract(&request("Acme")).unwrap();
        assert_eq!(spans[0].attributes.get("role").map(String::as_str), Some("buyer"));
    }

    #[test]
    fn test_failure_marker() {
        let provider = MockExtractionProvider::new()
            .with_pattern("party", "Acme")
            .failing_on("CORRUPT", "API failed");

        assert!(provider.extract(&request("Acme")).is_ok());
        let err = provider.extract(&request("CORRUPT Acme")).unwrap_err();
        assert_eq!(err.to_string(), "LLM error: API failed");
        assert_eq!(provider.call_count(), 2);
    }

    #[test]
    fn test_spans_sorted_by_position() {
        let provider = MockExtractionProvider::new()
            .with_pattern("date", "2024")
            .with_pattern("party", "Acme");
        let spans = provider.extract(&request("Acme signed in 2024")).unwrap();
        let classes: Vec<&str> = spans.iter().map(|s| s.class.as_str()).collect();
        assert_eq!(classes, vec!["party", "date"]);
    }
}
