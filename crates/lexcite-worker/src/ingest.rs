//! Ingest task: read files, optionally extract, build the session context

use crate::blocking::{panic_message, run_blocking, BlockingFailure};
use crate::channel::ResultSender;
use crate::error::WorkerError;
use crate::message::{IngestOutcome, WorkResult};
use lexcite_domain::{Document, ExtractionProvider, ExtractionResult, SchemaKind};
use lexcite_extractor::{build_enriched_context, build_structured_context, ExtractionEngine, ExtractorConfig};
use lexcite_reader::{read_document, ReaderError};
use lexcite_store::ExtractionCache;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Produces the extraction result for one loaded document
///
/// Runs on the blocking pool, so implementations may do file and network I/O.
pub trait DocumentExtractor: Send + Sync {
    /// Extract `doc`, which was read from `path`
    fn extract_document(&self, path: &Path, doc: &Document) -> ExtractionResult;
}

/// Engine, schema and provider settings for extraction during ingestion,
/// with an optional cache in front
pub struct ExtractionPlan<P> {
    engine: ExtractionEngine<P>,
    cache: Option<Arc<ExtractionCache>>,
    schema: SchemaKind,
    config: ExtractorConfig,
}

impl<P> ExtractionPlan<P> {
    /// Extract with `engine` under `schema`, uncached
    pub fn new(engine: ExtractionEngine<P>, schema: SchemaKind, config: ExtractorConfig) -> Self {
        Self {
            engine,
            cache: None,
            schema,
            config,
        }
    }

    /// Consult and fill `cache`
    pub fn with_cache(mut self, cache: Arc<ExtractionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Schema used for every document
    pub fn schema(&self) -> &SchemaKind {
        &self.schema
    }
}

impl<P> DocumentExtractor for ExtractionPlan<P>
where
    P: ExtractionProvider + Send + Sync,
    P::Error: Display,
{
    fn extract_document(&self, path: &Path, doc: &Document) -> ExtractionResult {
        if let Some(cached) = self.cache.as_ref().and_then(|c| c.get(path, &self.schema)) {
            debug!("Using cached extraction for {}", doc.name);
            return cached;
        }

        let result = self
            .engine
            .run_extraction(&doc.text, &doc.name, &self.schema, &self.config);

        // Failed results are retried on the next ingestion
        if !result.is_failed() {
            if let Some(cache) = &self.cache {
                cache.put(path, &self.schema, &result);
            }
        }
        result
    }
}

/// Reads a file set and posts one `ingest_done` or `ingest_error`
///
/// # Examples
///
/// ```no_run
/// use lexcite_worker::{result_channel, IngestTask, WorkResult};
///
/// # async fn example() {
/// let (tx, mut rx) = result_channel();
/// IngestTask::new(vec!["contract.pdf".into(), "notes.txt".into()]).spawn(&tx);
///
/// match rx.recv().await {
///     Some(WorkResult::IngestDone(outcome)) => println!("{} document(s)", outcome.documents.len()),
///     Some(WorkResult::IngestError { message }) => eprintln!("{}", message),
///     _ => {}
/// }
/// # }
/// ```
pub struct IngestTask {
    files: Vec<PathBuf>,
    extractor: Option<Arc<dyn DocumentExtractor>>,
    timeout: Option<Duration>,
}

impl IngestTask {
    /// Ingest `files` without extraction
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self {
            files,
            extractor: None,
            timeout: None,
        }
    }

    /// Run `extractor` over every loaded document
    pub fn with_extraction(mut self, extractor: impl DocumentExtractor + 'static) -> Self {
        self.extractor = Some(Arc::new(extractor));
        self
    }

    /// Bound each document's extraction call; a miss becomes an extraction failure
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run on the current runtime and post the outcome to `results`
    pub fn spawn(self, results: &ResultSender) -> JoinHandle<()> {
        let results = results.clone();
        tokio::spawn(async move {
            results.send(self.run().await);
        })
    }

    /// Run to completion and return the terminal message
    pub async fn run(self) -> WorkResult {
        let started = Instant::now();
        info!("Ingesting {} file(s)", self.files.len());

        match self.execute().await {
            Ok(outcome) => {
                info!(
                    "Ingestion finished in {:?}: {} document(s), {} warning(s)",
                    started.elapsed(),
                    outcome.documents.len(),
                    outcome.warnings.len()
                );
                WorkResult::IngestDone(outcome)
            }
            Err(e) => {
                warn!("Ingestion failed: {}", e);
                WorkResult::IngestError { message: e.to_string() }
            }
        }
    }

    async fn execute(self) -> Result<IngestOutcome, WorkerError> {
        let files = self.files;
        let (loaded, mut warnings) = run_blocking(move || load_documents(&files), None)
            .await
            .map_err(|failure| match failure {
                BlockingFailure::Panicked(msg) => WorkerError::Ingest(msg),
                BlockingFailure::TimedOut(limit) => WorkerError::Ingest(format!("timed out after {:?}", limit)),
            })?;

        if loaded.is_empty() {
            return Err(WorkerError::NoDocuments(warnings.join("\n")));
        }

        let mut extraction_results = Vec::new();
        if let Some(extractor) = &self.extractor {
            for (path, doc) in &loaded {
                let result = extract_one(Arc::clone(extractor), path, doc, self.timeout).await;
                if let Some(error) = &result.error {
                    warnings.push(format!("{}: extraction warning - {}", doc.name, error));
                }
                extraction_results.push(result);
            }
        }

        let documents: Vec<Document> = loaded.into_iter().map(|(_, doc)| doc).collect();
        let raw_context = build_structured_context(&documents);
        let context = if self.extractor.is_some() {
            build_enriched_context(&extraction_results, &raw_context)
        } else {
            raw_context
        };

        Ok(IngestOutcome {
            documents,
            context,
            warnings,
            extraction_results,
        })
    }
}

fn load_documents(files: &[PathBuf]) -> (Vec<(PathBuf, Document)>, Vec<String>) {
    load_documents_with(files, read_document)
}

/// Read each file with `read`; failures and panics become per-file warnings
fn load_documents_with<R>(files: &[PathBuf], read: R) -> (Vec<(PathBuf, Document)>, Vec<String>)
where
    R: Fn(&Path) -> Result<Document, ReaderError>,
{
    let mut loaded = Vec::new();
    let mut warnings = Vec::new();

    for path in files {
        // pdf-extract panics on some malformed files
        match panic::catch_unwind(AssertUnwindSafe(|| read(path))) {
            Ok(Ok(doc)) if doc.is_blank() => {
                debug!("{} has no extractable text", path.display());
                warnings.push(format!("{}: no extractable text", doc.name));
            }
            Ok(Ok(doc)) => {
                debug!("Loaded {} ({} chars)", doc.name, doc.text.chars().count());
                loaded.push((path.clone(), doc));
            }
            Ok(Err(e)) => {
                debug!("Could not read {}: {}", path.display(), e);
                warnings.push(format!("{}: {}", display_name(path), e));
            }
            Err(payload) => {
                let message = panic_message(&*payload);
                warn!("Reader panicked on {}: {}", path.display(), message);
                warnings.push(format!("{}: reader panicked: {}", display_name(path), message));
            }
        }
    }

    (loaded, warnings)
}

async fn extract_one(
    extractor: Arc<dyn DocumentExtractor>,
    path: &Path,
    doc: &Document,
    timeout: Option<Duration>,
) -> ExtractionResult {
    let (path, owned) = (path.to_path_buf(), doc.clone());
    let outcome = run_blocking(move || extractor.extract_document(&path, &owned), timeout).await;

    match outcome {
        Ok(result) => result,
        Err(BlockingFailure::TimedOut(limit)) => {
            warn!("Extraction for {} timed out after {:?}", doc.name, limit);
            ExtractionResult::failure(&doc.name, format!("extraction timed out after {:?}", limit))
        }
        Err(BlockingFailure::Panicked(msg)) => {
            ExtractionResult::failure(&doc.name, format!("extraction panicked: {}", msg))
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexcite_extractor::INDEX_HEADER;
    use lexcite_llm::MockExtractionProvider;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, text).unwrap();
        path
    }

    struct SlowExtractor(Duration);

    impl DocumentExtractor for SlowExtractor {
        fn extract_document(&self, _path: &Path, doc: &Document) -> ExtractionResult {
            std::thread::sleep(self.0);
            ExtractionResult::success(&doc.name, vec![])
        }
    }

    #[test]
    fn test_load_documents_collects_warnings() {
        let dir = TempDir::new().unwrap();
        let files = vec![
            write(&dir, "a.txt", "Alpha"),
            write(&dir, "blank.txt", "  \n "),
            write(&dir, "notes.md", "# not supported"),
            dir.path().join("missing.txt"),
        ];

        let (loaded, warnings) = load_documents(&files);

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].1, Document::new("a.txt", "Alpha"));
        assert_eq!(warnings.len(), 3);
        assert_eq!(warnings[0], "blank.txt: no extractable text");
        assert!(warnings[1].starts_with("notes.md: Unsupported file type"));
        assert!(warnings[2].starts_with("missing.txt: Read failed"));
    }

    #[test]
    fn test_reader_panic_only_skips_that_file() {
        let dir = TempDir::new().unwrap();
        let files = vec![write(&dir, "broken.pdf", "%PDF-1.4"), write(&dir, "hello.txt", "Hello world")];

        let (loaded, warnings) = load_documents_with(&files, |path| {
            if path.extension().is_some_and(|ext| ext == "pdf") {
                panic!("invalid xref table");
            }
            read_document(path)
        });

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].1, Document::new("hello.txt", "Hello world"));
        assert_eq!(warnings, vec!["broken.pdf: reader panicked: invalid xref table".to_string()]);
    }

    #[tokio::test]
    async fn test_context_without_extraction() {
        let dir = TempDir::new().unwrap();
        let files = vec![write(&dir, "a.txt", "Alpha"), write(&dir, "b.txt", "Beta")];

        let WorkResult::IngestDone(outcome) = IngestTask::new(files).run().await else {
            panic!("expected ingest_done");
        };

        assert!(outcome.extraction_results.is_empty());
        assert!(!outcome.context.contains(INDEX_HEADER));
        assert!(outcome.context.contains("===== DOCUMENT 2: b.txt =====\n\nBeta"));
    }

    #[tokio::test]
    async fn test_extraction_deadline() {
        let dir = TempDir::new().unwrap();
        let task = IngestTask::new(vec![write(&dir, "a.txt", "Alpha")])
            .with_extraction(SlowExtractor(Duration::from_millis(300)))
            .with_timeout(Some(Duration::from_millis(20)));

        let WorkResult::IngestDone(outcome) = task.run().await else {
            panic!("expected ingest_done");
        };

        assert!(outcome.extraction_results[0].is_failed());
        assert!(outcome.warnings[0].starts_with("a.txt: extraction warning - extraction timed out"));
        assert!(outcome.context.contains("(extraction failed: extraction timed out"));
    }

    #[tokio::test]
    async fn test_plan_without_cache() {
        let dir = TempDir::new().unwrap();
        let engine = ExtractionEngine::new(MockExtractionProvider::new().with_pattern("party", "Acme"));
        let plan = ExtractionPlan::new(engine.clone(), SchemaKind::Contract, ExtractorConfig::default());
        assert_eq!(plan.schema(), &SchemaKind::Contract);

        let path = write(&dir, "a.txt", "Acme");
        let doc = Document::new("a.txt", "Acme");
        plan.extract_document(&path, &doc);
        plan.extract_document(&path, &doc);

        assert_eq!(engine.provider().call_count(), 2);
    }
}
