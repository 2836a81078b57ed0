//! Lexcite Domain Layer
//!
//! This crate contains the data model shared by every other Lexcite crate
//! and the trait interfaces for the external collaborators the core talks to.
//! Its only dependency is `serde` for derives.
//!
//! ## Key Concepts
//!
//! - **Document**: a named block of plain text produced by the reader
//! - **ExtractionRecord**: one labeled span with character offsets into its source document
//! - **ExtractionResult**: the per-document outcome of an extraction run (records or an error)
//! - **Citation**: an inline `[Source: ...]` marker parsed out of model output
//! - **Schemas**: named prompt/few-shot pairs that steer extraction
//!
//! ## Architecture
//!
//! - Pure data and trait definitions only
//! - Providers, storage and orchestration live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod citation;
pub mod document;
pub mod extraction;
pub mod schema;
pub mod traits;

// Re-exports for convenience
pub use citation::{Citation, EnrichedResponse};
pub use document::Document;
pub use extraction::{ExtractedSpan, ExtractionRecord, ExtractionResult};
pub use schema::{ExampleExtraction, ExtractionSchema, FewShotExample, SchemaKind};
pub use traits::{CompletionProvider, ExtractionProvider, ExtractionRequest, IterationLogger, LlmProvider};
