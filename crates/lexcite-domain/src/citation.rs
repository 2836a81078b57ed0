//! Citation module - parsed source markers and the enriched response

use serde::{Deserialize, Serialize};

/// A single `[Source: ...]` marker found in generated text
///
/// `verified` is true iff `(doc_name, char_start, char_end)` exactly matches
/// an extraction recorded for the current session. There is no fuzzy or
/// nearest-offset matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Cited document name
    pub doc_name: String,

    /// Cited start offset
    pub char_start: usize,

    /// Cited end offset
    pub char_end: usize,

    /// Indexed text for a verified citation, empty otherwise
    pub extraction_text: String,

    /// Whether the triple matched the extraction index
    pub verified: bool,
}

/// A model response with its parsed citation metadata
///
/// Derived and read-only: recomputed for every response, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedResponse {
    /// The unmodified response text
    pub text: String,

    /// Citations in order of appearance
    pub citations: Vec<Citation>,

    /// Whether an `[Analysis]` marker appears anywhere in the text
    pub has_analysis_markers: bool,
}

impl EnrichedResponse {
    /// Number of citations that matched the index
    pub fn verified_count(&self) -> usize {
        self.citations.iter().filter(|c| c.verified).count()
    }

    /// Number of citations that did not match the index
    pub fn unverified_count(&self) -> usize {
        self.citations.len() - self.verified_count()
    }
}
