//! Citation parsing and verification

use lazy_static::lazy_static;
use lexcite_domain::{Citation, EnrichedResponse, ExtractionResult};
use regex::{Captures, Regex};
use std::collections::HashMap;
use tracing::debug;

lazy_static! {
    /// `[Source: contract.pdf, chars 142-158]`, also `char`, loose whitespace
    static ref CITATION_PATTERN: Regex =
        Regex::new(r"\[Source:\s*([^,\]\s][^,\]]*),\s*chars?\s*([0-9]+)\s*-\s*([0-9]+)\s*\]").unwrap();

    /// Literal analysis marker
    static ref ANALYSIS_PATTERN: Regex = Regex::new(r"\[Analysis\]").unwrap();
}

type IndexKey = (String, usize, usize);

/// Verifies citation markers against the extractions of one session
///
/// The lookup index maps `(doc_name, char_start, char_end)` of every
/// authoritative record to its text. Failed results contribute nothing.
#[derive(Debug, Clone, Default)]
pub struct CitationVerifier {
    index: HashMap<IndexKey, String>,
}

impl CitationVerifier {
    /// Build the lookup index from a batch of extraction results
    pub fn new(results: &[ExtractionResult]) -> Self {
        let index = results
            .iter()
            .flat_map(|result| {
                result.records().iter().map(move |record| {
                    (
                        (result.doc_name.clone(), record.char_start, record.char_end),
                        record.extraction_text.clone(),
                    )
                })
            })
            .collect();
        Self { index }
    }

    /// Number of indexed extractions
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True when nothing can ever verify
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Parse every citation marker in `response_text` and verify it
    ///
    /// Matching is exact and case-sensitive on the document name (after
    /// trimming surrounding whitespace) and both offsets. A marker whose
    /// offset does not fit in `usize` is kept as an unverified citation with
    /// that offset saturated to `usize::MAX`. The call is pure: the same input
    /// always yields the same output.
    ///
    /// # Examples
    ///
    /// ```
    /// use lexcite_domain::{ExtractionRecord, ExtractionResult};
    /// use lexcite_verifier::CitationVerifier;
    ///
    /// let results = vec![ExtractionResult::success(
    ///     "contract.pdf",
    ///     vec![ExtractionRecord::new("party", "Acme Corporation", 142, 158)],
    /// )];
    /// let verifier = CitationVerifier::new(&results);
    ///
    /// let enriched = verifier.enrich("Acme is the buyer [Source: contract.pdf, chars 142-158].");
    /// assert_eq!(enriched.citations.len(), 1);
    /// assert!(enriched.citations[0].verified);
    /// assert_eq!(enriched.citations[0].extraction_text, "Acme Corporation");
    /// ```
    pub fn enrich(&self, response_text: &str) -> EnrichedResponse {
        let citations: Vec<Citation> = CITATION_PATTERN
            .captures_iter(response_text)
            .map(|caps| self.verify(&caps))
            .collect();

        let has_analysis_markers = ANALYSIS_PATTERN.is_match(response_text);

        debug!(
            "Parsed {} citation(s), {} verified, analysis markers: {}",
            citations.len(),
            citations.iter().filter(|c| c.verified).count(),
            has_analysis_markers
        );

        EnrichedResponse {
            text: response_text.to_string(),
            citations,
            has_analysis_markers,
        }
    }

    fn verify(&self, caps: &Captures<'_>) -> Citation {
        let doc_name = caps[1].trim().to_string();
        let offsets = (caps[2].parse::<usize>(), caps[3].parse::<usize>());

        let (char_start, char_end, lookup) = match offsets {
            (Ok(start), Ok(end)) => (start, end, self.index.get(&(doc_name.clone(), start, end))),
            (start, end) => {
                // Too large for any record, so it cannot be in the index
                debug!("Citation offset out of range: {}", &caps[0]);
                (start.unwrap_or(usize::MAX), end.unwrap_or(usize::MAX), None)
            }
        };

        Citation {
            doc_name,
            char_start,
            char_end,
            extraction_text: lookup.cloned().unwrap_or_default(),
            verified: lookup.is_some(),
        }
    }
}

/// Build a verifier for `results` and enrich `response_text` with it
pub fn enrich(response_text: &str, results: &[ExtractionResult]) -> EnrichedResponse {
    CitationVerifier::new(results).enrich(response_text)
}
