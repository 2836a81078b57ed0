//! Extraction provider backed by a text-generation LLM

use crate::chunking::{Chunk, TextChunker};
use crate::error::ExtractorError;
use crate::parser::{parse_llm_response, SpanCandidate};
use crate::prompt::PromptBuilder;
use lexcite_domain::traits::{ExtractionProvider, ExtractionRequest, LlmProvider};
use lexcite_domain::ExtractedSpan;
use std::collections::HashSet;
use std::fmt::Display;
use tracing::{debug, warn};

/// Runs span extraction by prompting an [`LlmProvider`]
///
/// The document is chunked at paragraph boundaries, each chunk is prompted
/// with the schema's description and examples, and every returned span is
/// located verbatim in the source to recover its character offsets. Spans
/// the model paraphrased (and that therefore cannot be located) are dropped.
///
/// # Examples
///
/// ```
/// use lexcite_extractor::LlmSpanExtractor;
/// use lexcite_domain::traits::{ExtractionProvider, ExtractionRequest};
/// use lexcite_llm::MockProvider;
///
/// let llm = MockProvider::new(r#"[{"class": "party", "text": "Acme"}]"#);
/// let extractor = LlmSpanExtractor::new(llm);
/// let request = ExtractionRequest {
///     text: "Sold to Acme.",
///     prompt_description: "Extract parties",
///     examples: &[],
///     model_id: "mock",
///     api_key: None,
///     passes: 1,
///     max_char_buffer: 2000,
/// };
///
/// let spans = extractor.extract(&request).unwrap();
/// assert_eq!((spans[0].char_start, spans[0].char_end), (8, 12));
/// ```
pub struct LlmSpanExtractor<L> {
    llm: L,
}

impl<L> LlmSpanExtractor<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Create an extractor over `llm`
    pub fn new(llm: L) -> Self {
        Self { llm }
    }

    /// Extract spans from one chunk
    fn extract_chunk(
        &self,
        chunk: &Chunk<'_>,
        request: &ExtractionRequest<'_>,
    ) -> Result<Vec<ExtractedSpan>, ExtractorError> {
        let prompt = PromptBuilder::new(chunk.text, request.prompt_description)
            .with_examples(request.examples)
            .build();
        debug!("Prompt length: {} chars", prompt.len());

        let response = self
            .llm
            .generate(&prompt)
            .map_err(|e| ExtractorError::Llm(e.to_string()))?;
        let candidates = parse_llm_response(&response)?;

        let mut spans = Vec::with_capacity(candidates.len());
        let mut cursor = 0;
        for candidate in candidates {
            match locate(chunk.text, &candidate.text, cursor) {
                Some((byte_start, byte_end)) => {
                    cursor = byte_end;
                    spans.push(to_span(chunk, candidate, byte_start));
                }
                None => warn!(
                    "Dropping {} extraction not found in source: {:?}",
                    candidate.class, candidate.text
                ),
            }
        }
        Ok(spans)
    }
}

impl<L> ExtractionProvider for LlmSpanExtractor<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    type Error = ExtractorError;

    fn extract(&self, request: &ExtractionRequest<'_>) -> Result<Vec<ExtractedSpan>, Self::Error> {
        if request.text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let chunks = TextChunker::new(request.max_char_buffer).chunk(request.text);
        debug!(
            "Extracting with {} over {} chunk(s), {} pass(es)",
            request.model_id,
            chunks.len(),
            request.passes
        );

        let mut seen = HashSet::new();
        let mut spans = Vec::new();
        for pass in 0..request.passes.max(1) {
            for chunk in &chunks {
                for span in self.extract_chunk(chunk, request)? {
                    if seen.insert((span.class.clone(), span.char_start, span.char_end)) {
                        spans.push(span);
                    }
                }
            }
            debug!("Pass {} complete: {} unique spans", pass + 1, spans.len());
        }

        spans.sort_by_key(|s| (s.char_start, s.char_end));
        Ok(spans)
    }
}

/// Byte range of `needle` in `haystack`, preferring matches at or after `cursor`
fn locate(haystack: &str, needle: &str, cursor: usize) -> Option<(usize, usize)> {
    let after = haystack
        .get(cursor..)
        .and_then(|rest| rest.find(needle))
        .map(|idx| cursor + idx);
    after
        .or_else(|| haystack.find(needle))
        .map(|start| (start, start + needle.len()))
}

fn to_span(chunk: &Chunk<'_>, candidate: SpanCandidate, byte_start: usize) -> ExtractedSpan {
    let char_start = chunk.char_offset + chunk.text[..byte_start].chars().count();
    ExtractedSpan {
        char_end: char_start + candidate.text.chars().count(),
        char_start,
        class: candidate.class,
        text: candidate.text,
        attributes: candidate.attributes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexcite_llm::MockProvider;

    fn request(text: &str, passes: u32, max_char_buffer: usize) -> ExtractionRequest<'_> {
        ExtractionRequest {
            text,
            prompt_description: "Extract parties",
            examples: &[],
            model_id: "mock",
            api_key: None,
            passes,
            max_char_buffer,
        }
    }

    #[test]
    fn test_spans_aligned_to_source() {
        let llm = MockProvider::new(
            r#"[{"class": "party", "text": "Acme Corporation", "attributes": {"role": "buyer"}}]"#,
        );
        let extractor = LlmSpanExtractor::new(llm);
        let text = "This agreement binds Acme Corporation.";

        let spans = extractor.extract(&request(text, 1, 2000)).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!((spans[0].char_start, spans[0].char_end), (21, 37));
        let slice: String = text.chars().skip(21).take(16).collect();
        assert_eq!(slice, "Acme Corporation");
        assert_eq!(spans[0].attributes["role"], "buyer");
    }

    #[test]
    fn test_unaligned_spans_dropped() {
        let llm = MockProvider::new(
            r#"[{"class": "party", "text": "ACME Corp"}, {"class": "party", "text": "Beta"}]"#,
        );
        let spans = LlmSpanExtractor::new(llm)
            .extract(&request("Acme Corporation and Beta", 1, 2000))
            .unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Beta");
    }

    #[test]
    fn test_repeated_text_advances_cursor() {
        let llm = MockProvider::new(
            r#"[{"class": "party", "text": "Acme"}, {"class": "party", "text": "Acme"}]"#,
        );
        let spans = LlmSpanExtractor::new(llm)
            .extract(&request("Acme sells to Acme", 1, 2000))
            .unwrap();
        let starts: Vec<usize> = spans.iter().map(|s| s.char_start).collect();
        assert_eq!(starts, vec![0, 14]);
    }

    #[test]
    fn test_passes_are_deduplicated() {
        let llm = MockProvider::new(r#"[{"class": "party", "text": "Acme"}]"#);
        let extractor = LlmSpanExtractor::new(llm.clone());

        let spans = extractor.extract(&request("Acme", 3, 2000)).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(llm.call_count(), 3);
    }

    #[test]
    fn test_offsets_across_chunks() {
        let llm = MockProvider::new(r#"[{"class": "party", "text": "Beta"}]"#);
        let extractor = LlmSpanExtractor::new(llm.clone());
        let text = "Alpha paragraph.\n\nBeta paragraph.";

        let spans = extractor.extract(&request(text, 1, 20)).unwrap();
        assert_eq!(llm.call_count(), 2);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].char_start, 18);
    }

    #[test]
    fn test_llm_error_propagates() {
        let extractor = LlmSpanExtractor::new(MockProvider::failing("quota exceeded"));
        let err = extractor.extract(&request("Acme", 1, 2000)).unwrap_err();
        assert!(matches!(err, ExtractorError::Llm(ref m) if m.contains("quota exceeded")));
    }

    #[test]
    fn test_blank_text_skips_llm() {
        let llm = MockProvider::new("[]");
        let extractor = LlmSpanExtractor::new(llm.clone());
        assert!(extractor.extract(&request("  \n ", 2, 2000)).unwrap().is_empty());
        assert_eq!(llm.call_count(), 0);
    }
}
