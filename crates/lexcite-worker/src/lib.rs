//! Lexcite Worker
//!
//! Background tasks for ingestion and queries, and the channel their results
//! travel on.
//!
//! # Overview
//!
//! Every unit of work is a task that runs on its own tokio task (provider
//! calls and file reads go to the blocking pool) and posts **exactly one**
//! terminal [`WorkResult`] to a shared [`ResultSender`]. The coordinator owns
//! the single [`ResultReceiver`] and drains it on a fixed interval.
//!
//! | Task            | Success        | Failure         |
//! |-----------------|----------------|-----------------|
//! | [`IngestTask`]  | `ingest_done`  | `ingest_error`  |
//! | [`QueryTask`]   | `query_done`   | `query_error`   |
//!
//! Per-file read failures and per-document extraction failures are collected
//! as warnings; only an ingestion with no readable document fails. A citation
//! that cannot be matched, even one with an unparseable offset, is reported as
//! unverified rather than dropping the answer's other citations.
//!
//! There is no cancellation. Without a deadline a hung provider call keeps
//! its task waiting forever; with [`WorkerConfig::provider_timeout_secs`] set
//! the task posts its failure when the deadline passes, while the blocking
//! call itself runs on until it returns.
//!
//! # Example Usage
//!
//! ```no_run
//! use lexcite_llm::OllamaProvider;
//! use lexcite_worker::{result_channel, IngestTask, QueryTask, SessionContext, WorkResult, WorkerConfig};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let config = WorkerConfig::default();
//! let (tx, mut rx) = result_channel();
//!
//! IngestTask::new(vec!["contract.pdf".into()]).spawn(&tx);
//! let batch = rx.poll(config.poll_interval()).await;
//!
//! if let Some(WorkResult::IngestDone(outcome)) = batch.into_iter().next() {
//!     let provider = Arc::new(OllamaProvider::default_endpoint("llama3.1"));
//!     let session = SessionContext::from_ingest(provider, &outcome);
//!     QueryTask::new("Who is the buyer?", session).spawn(&tx);
//! }
//! # }
//! ```

#![warn(missing_docs)]

mod blocking;
mod channel;
mod config;
mod error;
mod ingest;
mod message;
mod query;

pub use channel::{result_channel, ResultReceiver, ResultSender};
pub use config::WorkerConfig;
pub use error::WorkerError;
pub use ingest::{DocumentExtractor, ExtractionPlan, IngestTask};
pub use message::{IngestOutcome, LogRange, QueryOutcome, WorkResult};
pub use query::{QueryTask, SessionContext};
