//! Extraction module - labeled spans and per-document extraction outcomes

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A labeled span as returned by an extraction provider
///
/// Offsets are character positions into the text that was handed to the
/// provider. The engine turns these into [`ExtractionRecord`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSpan {
    /// Entity class, e.g. `party` or `effective_date`
    pub class: String,

    /// Exact source text of the span
    pub text: String,

    /// Start offset (inclusive)
    pub char_start: usize,

    /// End offset (exclusive)
    pub char_end: usize,

    /// Free-form key/value annotations
    pub attributes: BTreeMap<String, String>,
}

/// One extraction in the uniform record shape used by the index and the cache
///
/// `char_start <= char_end` always holds. Offsets point into the *source
/// document's* text, never into the combined session context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// Entity class
    pub extraction_class: String,

    /// Exact source text
    pub extraction_text: String,

    /// Start offset (inclusive)
    pub char_start: usize,

    /// End offset (exclusive)
    pub char_end: usize,

    /// Key/value annotations, ordered by key
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl ExtractionRecord {
    /// Create a record with no attributes
    pub fn new(
        extraction_class: impl Into<String>,
        extraction_text: impl Into<String>,
        char_start: usize,
        char_end: usize,
    ) -> Self {
        Self {
            extraction_class: extraction_class.into(),
            extraction_text: extraction_text.into(),
            char_start,
            char_end,
            attributes: BTreeMap::new(),
        }
    }

    /// Attach an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Converts a provider span; a reversed interval is handed back as the error
/// so the caller can drop it rather than trust offsets the provider never
/// reported.
impl TryFrom<ExtractedSpan> for ExtractionRecord {
    type Error = ExtractedSpan;

    fn try_from(span: ExtractedSpan) -> Result<Self, Self::Error> {
        if span.char_start > span.char_end {
            return Err(span);
        }
        Ok(Self {
            extraction_class: span.class,
            extraction_text: span.text,
            char_start: span.char_start,
            char_end: span.char_end,
            attributes: span.attributes,
        })
    }
}

/// Outcome of extracting entities from a single document
///
/// When `error` is set the extraction failed for this document and the
/// records must be treated as empty regardless of what `extractions` holds;
/// use [`ExtractionResult::records`] rather than reading the field directly.
/// Results are never patched: a cache overwrite replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Name of the document the records belong to
    pub doc_name: String,

    /// Records in provider order
    #[serde(default)]
    pub extractions: Vec<ExtractionRecord>,

    /// Failure message, if extraction failed
    #[serde(default)]
    pub error: Option<String>,
}

impl ExtractionResult {
    /// Successful result
    pub fn success(doc_name: impl Into<String>, extractions: Vec<ExtractionRecord>) -> Self {
        Self {
            doc_name: doc_name.into(),
            extractions,
            error: None,
        }
    }

    /// Failed result
    pub fn failure(doc_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            doc_name: doc_name.into(),
            extractions: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// True when extraction failed for this document
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// The authoritative records: empty whenever `error` is set
    ///
    /// # Examples
    ///
    /// ```
    /// use lexcite_domain::{ExtractionRecord, ExtractionResult};
    ///
    /// let mut result = ExtractionResult::failure("a.pdf", "timeout");
    /// result.extractions.push(ExtractionRecord::new("party", "Acme", 0, 4));
    /// assert!(result.records().is_empty());
    /// ```
    pub fn records(&self) -> &[ExtractionRecord] {
        if self.is_failed() {
            &[]
        } else {
            &self.extractions
        }
    }
}
