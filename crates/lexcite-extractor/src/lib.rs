//! Lexcite Extractor
//!
//! Runs structured span extraction over documents and builds the context the
//! completion model answers from.
//!
//! # Overview
//!
//! The [`ExtractionEngine`] looks up a named schema, hands each document to an
//! [`ExtractionProvider`](lexcite_domain::ExtractionProvider) and normalizes
//! the returned spans into [`ExtractionRecord`](lexcite_domain::ExtractionRecord)s.
//! Failures are isolated per document: they are captured on the document's
//! [`ExtractionResult`](lexcite_domain::ExtractionResult) and never abort a
//! batch.
//!
//! # Architecture
//!
//! ```text
//! Documents → ExtractionEngine → provider → ExtractionResults
//!                                              ↓
//!            format_extraction_index + build_structured_context
//!                                              ↓
//!                                   build_enriched_context
//! ```
//!
//! # Key Features
//!
//! - **Schema registry**: built-in `general` and `contract` schemas, plus
//!   explicitly registered custom ones
//! - **LLM-backed provider**: [`LlmSpanExtractor`] turns any text-generation
//!   provider into an extraction provider with exact character offsets
//! - **Context builders**: the extraction index and raw corpus renderings
//! - **System prompt**: instructions describing the context and citation format
//!
//! # Example Usage
//!
//! ```
//! use lexcite_extractor::{build_enriched_context, build_structured_context, ExtractionEngine, ExtractorConfig};
//! use lexcite_domain::{Document, SchemaKind};
//! use lexcite_llm::MockExtractionProvider;
//!
//! let engine = ExtractionEngine::new(MockExtractionProvider::new().with_pattern("party", "Acme"));
//! let docs = vec![Document::new("contract.txt", "Acme buys widgets.")];
//!
//! let results = engine.run_batch_extraction(&docs, &SchemaKind::General, &ExtractorConfig::default());
//! let context = build_enriched_context(&results, &build_structured_context(&docs));
//!
//! assert!(context.contains(r#"- party: "Acme" (chars 0-4)"#));
//! ```

#![warn(missing_docs)]

mod chunking;
mod config;
mod engine;
mod error;
mod index;
mod parser;
mod prompt;
mod schemas;
mod span_extractor;


pub use chunking::{Chunk, TextChunker};
pub use config::{ExtractorConfig, DEFAULT_MODEL_ID};
pub use engine::ExtractionEngine;
pub use error::ExtractorError;
pub use index::{build_enriched_context, build_structured_context, format_extraction_index, INDEX_HEADER};
pub use prompt::{build_system_prompt, EXTRACTION_CONTEXT_PROMPT};
pub use schemas::{SchemaRegistry, CLASSES_CONTRACT, CLASSES_GENERAL};
pub use span_extractor::LlmSpanExtractor;
