//! Text renderings fed to the completion model
//!
//! The extraction index and the raw corpus are part of the prompt contract:
//! the system prompt describes their exact layout, so changes here must be
//! mirrored there.
//!
//! ```text
//! ===== EXTRACTION INDEX =====
//! Pre-extracted structured data with source document and character offsets.
//!
//! [Document: contract.pdf]
//!   - party: "Acme Corporation" (chars 142-158)  {"role":"buyer"}
//!
//! [Document: scan.pdf]  (extraction failed: timeout)
//! ```

use lexcite_domain::{Document, ExtractionRecord, ExtractionResult};

/// First line of the extraction index
pub const INDEX_HEADER: &str = "===== EXTRACTION INDEX =====";

const INDEX_PREAMBLE: &str =
    "Pre-extracted structured data with source document and character offsets.";

/// Render extraction results as the plain-text index
///
/// One block per result, in order, each followed by a blank line.
///
/// # Examples
///
/// ```
/// use lexcite_extractor::{format_extraction_index, INDEX_HEADER};
///
/// let index = format_extraction_index(&[]);
/// assert!(index.starts_with(INDEX_HEADER));
/// assert!(!index.contains("[Document:"));
/// ```
pub fn format_extraction_index(results: &[ExtractionResult]) -> String {
    let mut lines = vec![INDEX_HEADER.to_string(), INDEX_PREAMBLE.to_string(), String::new()];

    for result in results {
        if let Some(error) = &result.error {
            lines.push(format!(
                "[Document: {}]  (extraction failed: {})",
                result.doc_name, error
            ));
        } else if result.extractions.is_empty() {
            lines.push(format!("[Document: {}]  (no extractions found)", result.doc_name));
        } else {
            lines.push(format!("[Document: {}]", result.doc_name));
            lines.extend(result.extractions.iter().map(format_record));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

fn format_record(record: &ExtractionRecord) -> String {
    let mut line = format!(
        "  - {}: \"{}\" (chars {}-{})",
        record.extraction_class, record.extraction_text, record.char_start, record.char_end
    );
    if !record.attributes.is_empty() {
        // BTreeMap keeps the key order stable
        let attrs = serde_json::to_string(&record.attributes).unwrap_or_default();
        line.push_str("  ");
        line.push_str(&attrs);
    }
    line
}

/// Render documents as the raw corpus
///
/// A short preamble, then each document as
/// `===== DOCUMENT <n>: <name> =====`, a blank line and its full text.
/// Numbering starts at 1.
pub fn build_structured_context(docs: &[Document]) -> String {
    let header = format!(
        "The following context contains {} document(s) extracted from source files.\n\
         Each document is delimited by ===== DOCUMENT N: <filename> =====.\n",
        docs.len()
    );

    let sections: Vec<String> = docs
        .iter()
        .enumerate()
        .map(|(i, doc)| format!("===== DOCUMENT {}: {} =====\n\n{}", i + 1, doc.name, doc.text))
        .collect();

    format!("{}\n\n{}", header, sections.join("\n\n"))
}

/// Index followed by the raw corpus
///
/// The index always comes first so the model sees the structured hints
/// before the raw prose.
pub fn build_enriched_context(results: &[ExtractionResult], raw_context: &str) -> String {
    format!("{}\n\n{}", format_extraction_index(results), raw_context)
}
