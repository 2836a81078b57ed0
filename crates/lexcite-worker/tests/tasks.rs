//! Ingest and query tasks end to end over the result channel

use lexcite_domain::{ExtractionRecord, ExtractionResult, SchemaKind};
use lexcite_extractor::{ExtractionEngine, ExtractorConfig, INDEX_HEADER};
use lexcite_llm::{JsonlIterationLog, MockExtractionProvider, MockProvider};
use lexcite_store::ExtractionCache;
use lexcite_worker::{
    result_channel, ExtractionPlan, IngestOutcome, IngestTask, QueryTask, SessionContext, WorkResult,
    WorkerConfig,
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).unwrap();
    path
}

fn expect_ingest_done(result: WorkResult) -> IngestOutcome {
    match result {
        WorkResult::IngestDone(outcome) => outcome,
        other => panic!("expected ingest_done, got {:?}", other),
    }
}

fn acme_results() -> Vec<ExtractionResult> {
    vec![ExtractionResult::success(
        "contract.pdf",
        vec![ExtractionRecord::new("party", "Acme Corporation", 142, 158)],
    )]
}

#[tokio::test]
async fn test_ingest_with_one_unreadable_file() {
    let dir = TempDir::new().unwrap();
    let files = vec![write(&dir, "hello.txt", "Hello world"), dir.path().join("gone.txt")];
    let (tx, mut rx) = result_channel();

    IngestTask::new(files).spawn(&tx).await.unwrap();

    let batch = rx.drain();
    assert_eq!(batch.len(), 1);
    let outcome = expect_ingest_done(batch.into_iter().next().unwrap());
    assert_eq!(outcome.documents.len(), 1);
    assert_eq!(outcome.documents[0].name, "hello.txt");
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("gone.txt"));
    assert!(outcome.context.contains("===== DOCUMENT 1: hello.txt =====\n\nHello world"));
}

#[tokio::test]
async fn test_ingest_with_no_documents() {
    let dir = TempDir::new().unwrap();
    let files = vec![write(&dir, "empty.txt", ""), dir.path().join("gone.txt")];

    match IngestTask::new(files).run().await {
        WorkResult::IngestError { message } => {
            assert!(message.starts_with("No documents could be loaded.\n"));
            assert!(message.contains("empty.txt: no extractable text"));
            assert!(message.contains("gone.txt"));
        }
        other => panic!("expected ingest_error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_ingest_with_extraction_and_cache() {
    let dir = TempDir::new().unwrap();
    let cache_dir = TempDir::new().unwrap();
    let cache = Arc::new(ExtractionCache::open(cache_dir.path()).unwrap());
    let files = vec![
        write(&dir, "contract.txt", "Acme Corporation buys from Widget Ltd."),
        write(&dir, "broken.txt", "CORRUPT scan"),
    ];

    let engine = ExtractionEngine::new(
        MockExtractionProvider::new()
            .with_pattern("party", "Acme Corporation")
            .failing_on("CORRUPT", "model refused"),
    );
    let plan = || {
        ExtractionPlan::new(engine.clone(), SchemaKind::Contract, ExtractorConfig::default())
            .with_cache(Arc::clone(&cache))
    };

    let first = expect_ingest_done(IngestTask::new(files.clone()).with_extraction(plan()).run().await);

    assert_eq!(first.extraction_results.len(), 2);
    assert_eq!(
        first.extraction_results[0].records(),
        &[ExtractionRecord::new("party", "Acme Corporation", 0, 16)]
    );
    assert!(first.extraction_results[1].is_failed());
    assert_eq!(first.warnings.len(), 1);
    assert!(first.warnings[0].starts_with("broken.txt: extraction warning - "));
    assert!(first.warnings[0].contains("model refused"));
    assert!(first.context.starts_with(INDEX_HEADER));
    assert!(first.context.contains("[Document: broken.txt]  (extraction failed: "));

    // Only the successful result is cached
    assert_eq!(cache.len(), 1);
    assert_eq!(engine.provider().call_count(), 2);

    let second = expect_ingest_done(IngestTask::new(files).with_extraction(plan()).run().await);

    // contract.txt came from the cache, broken.txt was retried
    assert_eq!(engine.provider().call_count(), 3);
    assert_eq!(second.extraction_results, first.extraction_results);
    assert_eq!(second.context, first.context);
}

#[tokio::test]
async fn test_concurrent_ingests_share_cache() {
    let cache_dir = TempDir::new().unwrap();
    let cache = Arc::new(ExtractionCache::open(cache_dir.path()).unwrap());
    let engine = ExtractionEngine::new(MockExtractionProvider::new().with_pattern("party", "Acme"));
    let (tx, mut rx) = result_channel();

    let mut dirs = Vec::new();
    let mut handles = Vec::new();
    for i in 0..4 {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, &format!("doc{}.txt", i), "Acme signs.");
        let plan = ExtractionPlan::new(engine.clone(), SchemaKind::General, ExtractorConfig::default())
            .with_cache(Arc::clone(&cache));
        handles.push(IngestTask::new(vec![file]).with_extraction(plan).spawn(&tx));
        dirs.push(dir);
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let batch = rx.drain();
    assert_eq!(batch.len(), 4);
    assert!(batch.iter().all(|r| r.kind() == "ingest_done"));
    assert_eq!(cache.len(), 4);
}

#[tokio::test]
async fn test_query_with_verified_citation() {
    let provider = Arc::new(MockProvider::new(
        "Acme is the buyer [Source: contract.pdf, chars 142-158].",
    ));
    let session = SessionContext::new(provider, "context").with_extraction_results(acme_results());
    let (tx, mut rx) = result_channel();

    QueryTask::new("Who is the buyer?", session).spawn(&tx).await.unwrap();

    match rx.drain().pop() {
        Some(WorkResult::QueryDone(outcome)) => {
            assert_eq!(outcome.query, "Who is the buyer?");
            let enriched = outcome.enriched.expect("enriched response");
            assert_eq!(enriched.citations.len(), 1);
            assert!(enriched.citations[0].verified);
            assert_eq!(enriched.citations[0].extraction_text, "Acme Corporation");
            assert!(outcome.log_range.is_none());
        }
        other => panic!("expected query_done, got {:?}", other),
    }
}

#[tokio::test]
async fn test_query_provider_error() {
    let provider = Arc::new(MockProvider::failing("backend unavailable: 503"));
    let session = SessionContext::new(provider, "context").with_extraction_results(acme_results());
    let (tx, mut rx) = result_channel();

    QueryTask::new("Who is the buyer?", session).spawn(&tx).await.unwrap();

    let batch = rx.drain();
    assert_eq!(batch.len(), 1);
    match &batch[0] {
        WorkResult::QueryError { query, message } => {
            assert_eq!(query, "Who is the buyer?");
            assert!(message.starts_with("Query failed: "));
            assert!(message.contains("backend unavailable: 503"));
        }
        other => panic!("expected query_error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_query_without_extraction_results_is_not_enriched() {
    let provider = Arc::new(MockProvider::new("[Source: contract.pdf, chars 142-158]"));
    let session = SessionContext::new(provider, "context");

    match QueryTask::new("q", session).run().await {
        WorkResult::QueryDone(outcome) => assert!(outcome.enriched.is_none()),
        other => panic!("expected query_done, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unparseable_citation_keeps_answer_enriched() {
    let answer = "Acme [Source: contract.pdf, chars 142-158] [Source: contract.pdf, chars 1-99999999999999999999999]";
    let provider = Arc::new(MockProvider::new(answer));
    let session = SessionContext::new(provider, "context").with_extraction_results(acme_results());

    match QueryTask::new("q", session).run().await {
        WorkResult::QueryDone(outcome) => {
            assert_eq!(outcome.response, answer);
            let enriched = outcome.enriched.expect("enriched response");
            let verified: Vec<bool> = enriched.citations.iter().map(|c| c.verified).collect();
            assert_eq!(verified, vec![true, false]);
        }
        other => panic!("expected query_done, got {:?}", other),
    }
}

#[tokio::test]
async fn test_query_records_log_range() {
    let log_dir = TempDir::new().unwrap();
    let log = Arc::new(JsonlIterationLog::create(log_dir.path(), "mock", "test-model").unwrap());
    let provider = Arc::new(MockProvider::new("answer").with_iteration_log(Arc::clone(&log)));
    let session = SessionContext::new(provider, "context").with_logger(log.clone());

    for expected_start in 0..2u64 {
        match QueryTask::new("q", session.clone()).run().await {
            WorkResult::QueryDone(outcome) => {
                let range = outcome.log_range.expect("log range");
                assert_eq!((range.start, range.end), (expected_start, expected_start + 1));
                assert_eq!(range.len(), 1);
                assert_eq!(range.path.as_deref(), Some(log.path()));
            }
            other => panic!("expected query_done, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_query_deadline() {
    let provider = Arc::new(MockProvider::new("late").with_delay(Duration::from_millis(500)));
    let session = SessionContext::new(provider, "context");
    let config = WorkerConfig {
        provider_timeout_secs: Some(1),
        ..WorkerConfig::default()
    };
    assert_eq!(config.provider_timeout(), Some(Duration::from_secs(1)));

    let result = QueryTask::new("q", session)
        .with_timeout(Some(Duration::from_millis(50)))
        .run()
        .await;

    match result {
        WorkResult::QueryError { message, .. } => assert!(message.contains("timed out")),
        other => panic!("expected query_error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_one_message_per_task_in_completion_order() {
    let (tx, mut rx) = result_channel();
    let slow = SessionContext::new(
        Arc::new(MockProvider::new("slow").with_delay(Duration::from_millis(200))),
        "ctx",
    );
    let fast = SessionContext::new(Arc::new(MockProvider::new("fast")), "ctx");

    let a = QueryTask::new("slow question", slow).spawn(&tx);
    let b = QueryTask::new("fast question", fast).spawn(&tx);
    drop(tx);

    let mut seen = Vec::new();
    loop {
        let batch = rx.poll(Duration::from_millis(10)).await;
        if batch.is_empty() {
            break;
        }
        seen.extend(batch);
    }
    a.await.unwrap();
    b.await.unwrap();

    let queries: Vec<String> = seen
        .into_iter()
        .map(|r| match r {
            WorkResult::QueryDone(outcome) => outcome.query,
            other => panic!("unexpected {:?}", other),
        })
        .collect();
    assert_eq!(queries, vec!["fast question", "slow question"]);
}
