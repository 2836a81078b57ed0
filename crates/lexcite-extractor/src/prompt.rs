//! Prompt construction
//!
//! Two prompts live here: the per-chunk span extraction prompt sent by
//! [`LlmSpanExtractor`](crate::LlmSpanExtractor), and the system prompt that
//! tells the completion model how the combined context is laid out and how
//! to cite it.

use crate::parser::SpanCandidate;
use lexcite_domain::FewShotExample;

/// Instructions describing the extraction index and the citation format
pub const EXTRACTION_CONTEXT_PROMPT: &str = r#"CONTEXT STRUCTURE
=================
The context contains two sections:

1. EXTRACTION INDEX: Pre-extracted structured data from the document corpus.
   Each entry includes the document name, extraction class, extracted text,
   and character offsets (char_start-char_end) in the source document.
   Use this section to plan your analysis and locate specific facts quickly.

2. RAW DOCUMENTS: Full text of each document, delimited by
   ===== DOCUMENT N: <filename> =====
   Use this section when you need to read surrounding context, verify
   extractions, or find information not covered by the extraction index.

CITATION REQUIREMENTS
=====================
When making factual claims, include inline citations using this format:
  [Source: document_name, chars start-end]

For claims derived from the extraction index, use the character offsets
provided. For claims found by reading the raw text, determine the
approximate character offset.

For analytical or inferential statements (comparisons, risk assessments,
recommendations), prefix with [Analysis] to distinguish from grounded facts."#;

/// Compose the full system prompt
///
/// Ordering: extraction instructions, then custom instructions, then the
/// base prompt, separated by blank lines. Empty parts are skipped.
///
/// # Examples
///
/// ```
/// use lexcite_extractor::build_system_prompt;
///
/// assert_eq!(build_system_prompt(false, Some("Be brief."), "BASE"), "Be brief.\n\nBASE");
/// assert_eq!(build_system_prompt(false, None, ""), "");
/// ```
pub fn build_system_prompt(
    extraction_enabled: bool,
    custom_instructions: Option<&str>,
    base_prompt: &str,
) -> String {
    let mut parts = Vec::new();
    if extraction_enabled {
        parts.push(EXTRACTION_CONTEXT_PROMPT);
    }
    if let Some(custom) = custom_instructions.filter(|c| !c.trim().is_empty()) {
        parts.push(custom);
    }
    if !base_prompt.is_empty() {
        parts.push(base_prompt);
    }
    parts.join("\n\n")
}

/// Builds the prompt asking the LLM to extract spans from one chunk
pub struct PromptBuilder<'a> {
    text: &'a str,
    description: &'a str,
    examples: &'a [FewShotExample],
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(text: &'a str, description: &'a str) -> Self {
        Self {
            text,
            description,
            examples: &[],
        }
    }

    /// Add worked examples
    pub fn with_examples(mut self, examples: &'a [FewShotExample]) -> Self {
        self.examples = examples;
        self
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Task description and format
        prompt.push_str(self.description);
        prompt.push_str("\n\n");
        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        // 2. Few-shot examples
        for (idx, example) in self.examples.iter().enumerate() {
            prompt.push_str(&format!("Example {}:\n---\n{}\n---\n", idx + 1, example.text));
            prompt.push_str(&format!("Output:\n{}\n\n", example_output(example)));
        }

        // 3. The text to analyze
        prompt.push_str("Text to analyze:\n---\n");
        prompt.push_str(self.text);
        prompt.push_str("\n---\n\n");

        // 4. Output format reminder
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

/// Expected JSON output for an example
fn example_output(example: &FewShotExample) -> String {
    let spans: Vec<SpanCandidate> = example
        .extractions
        .iter()
        .map(|e| SpanCandidate {
            class: e.class.clone(),
            text: e.text.clone(),
            attributes: e.attributes.clone(),
        })
        .collect();
    serde_json::to_string_pretty(&spans).unwrap_or_else(|_| "[]".to_string())
}

const EXTRACTION_INSTRUCTIONS: &str = r#"Each extraction is a JSON object:

{
  "class": "extraction class",
  "text": "exact text copied from the source",
  "attributes": {"key": "value"}
}

Rules:
- Copy "text" verbatim from the source, including punctuation and capitalization
- Do not paraphrase, summarize or merge separate passages
- List extractions in the order they appear in the text
- Use attributes for context such as roles, conditions or the kind of reference"#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (JSON array only, no additional text):
[
  {"class": "...", "text": "...", "attributes": {}}
]

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;
