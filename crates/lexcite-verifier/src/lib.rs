//! Lexcite Verifier
//!
//! Checks the citation markers in a model answer against the extraction
//! index of the session.
//!
//! A citation marker looks like `[Source: contract.pdf, chars 142-158]`. A
//! citation is *verified* only when the exact `(document, start, end)`
//! triple names an extraction produced for that document, so every verified
//! claim is backed by text the extractor really found. Unmatched citations
//! are kept and reported as unverified, including markers whose offsets are
//! too large to parse.
//!
//! Answers may also flag interpretive passages with a literal `[Analysis]`
//! marker; its presence is reported on the [`EnrichedResponse`](lexcite_domain::EnrichedResponse).

#![warn(missing_docs)]

mod verifier;

pub use verifier::{enrich, CitationVerifier};
