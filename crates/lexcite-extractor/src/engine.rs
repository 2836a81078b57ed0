//! Core extraction engine

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::schemas::SchemaRegistry;
use lexcite_domain::traits::ExtractionProvider;
use lexcite_domain::{Document, ExtractionRecord, ExtractionResult, SchemaKind};
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runs an [`ExtractionProvider`] over documents and normalizes its output
///
/// Every provider failure, including an unknown schema or a panic inside the
/// provider, is captured on the returned [`ExtractionResult`]. Nothing is
/// raised to the caller, so one bad document cannot abort a batch.
pub struct ExtractionEngine<P> {
    provider: Arc<P>,
    registry: SchemaRegistry,
}

impl<P> Clone for ExtractionEngine<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            registry: self.registry.clone(),
        }
    }
}

impl<P> ExtractionEngine<P>
where
    P: ExtractionProvider,
    P::Error: Display,
{
    /// Create an engine with the built-in schemas
    pub fn new(provider: P) -> Self {
        Self::from_arc(Arc::new(provider))
    }

    /// Create an engine over a shared provider
    pub fn from_arc(provider: Arc<P>) -> Self {
        Self {
            provider,
            registry: SchemaRegistry::builtin(),
        }
    }

    /// Replace the schema registry
    pub fn with_registry(mut self, registry: SchemaRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Schemas this engine knows about
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// The underlying provider
    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    /// Extract one document
    pub fn run_extraction(
        &self,
        text: &str,
        doc_name: &str,
        schema: &SchemaKind,
        config: &ExtractorConfig,
    ) -> ExtractionResult {
        let started = Instant::now();
        info!(
            "Starting extraction for '{}' ({} chars, schema {})",
            doc_name,
            text.chars().count(),
            schema
        );

        match self.try_extract(text, schema, config) {
            Ok(records) => {
                info!(
                    "Extracted {} record(s) from '{}' in {:?}",
                    records.len(),
                    doc_name,
                    started.elapsed()
                );
                ExtractionResult::success(doc_name, records)
            }
            Err(e) => {
                warn!("Extraction failed for {}: {}", doc_name, e);
                ExtractionResult::failure(doc_name, e.to_string())
            }
        }
    }

    /// Extract every document in order
    ///
    /// The output has one result per input document, in input order.
    pub fn run_batch_extraction(
        &self,
        docs: &[Document],
        schema: &SchemaKind,
        config: &ExtractorConfig,
    ) -> Vec<ExtractionResult> {
        debug!("Batch extraction over {} document(s)", docs.len());
        docs.iter()
            .map(|doc| self.run_extraction(&doc.text, &doc.name, schema, config))
            .collect()
    }

    fn try_extract(
        &self,
        text: &str,
        schema: &SchemaKind,
        config: &ExtractorConfig,
    ) -> Result<Vec<ExtractionRecord>, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        let schema = self.registry.get(schema)?;
        let request = config.request(text, &schema.prompt_description, &schema.examples);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.provider.extract(&request)))
            .map_err(|payload| {
                ExtractorError::Provider(format!("provider panicked: {}", panic_message(&*payload)))
            })?;
        let spans = outcome.map_err(|e| ExtractorError::Provider(e.to_string()))?;

        Ok(spans
            .into_iter()
            .filter_map(|span| match ExtractionRecord::try_from(span) {
                Ok(record) => Some(record),
                Err(span) => {
                    warn!(
                        "Dropping {} span \"{}\" with reversed offsets {}-{}",
                        span.class, span.text, span.char_start, span.char_end
                    );
                    None
                }
            })
            .collect())
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
