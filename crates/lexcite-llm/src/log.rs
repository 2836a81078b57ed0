//! JSON-lines iteration log
//!
//! A log file holds one `metadata` line written at creation followed by one
//! `iteration` line per completion call:
//!
//! ```text
//! {"type":"metadata","backend":"ollama","model":"llama3","created_at":1760000000}
//! {"type":"iteration","iteration":1,"iteration_time":1.42,"model_response":"..."}
//! ```
//!
//! Callers that want the iterations of one query read
//! [`JsonlIterationLog::iteration_count`] before and after the call and pass
//! that range to [`read_log_range`].

use crate::LlmError;
use lexcite_domain::traits::IterationLogger;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Longest model response printed by [`format_log_entries`]
const MAX_RESPONSE_CHARS: usize = 2000;

/// One line of an iteration log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LogEntry {
    /// Written once when the log is created
    Metadata {
        /// Backend name, e.g. `ollama`
        backend: String,
        /// Model identifier
        model: String,
        /// Creation time, seconds since the Unix epoch
        #[serde(default)]
        created_at: u64,
    },

    /// One completion call
    Iteration {
        /// 1-based iteration number
        iteration: u64,
        /// Wall time of the call in seconds
        #[serde(default)]
        iteration_time: f64,
        /// Raw model output
        #[serde(default)]
        model_response: String,
    },

    /// Entry kinds written by other tools
    #[serde(other)]
    Unknown,
}

/// Append-only iteration log backed by a `.jsonl` file
#[derive(Debug)]
pub struct JsonlIterationLog {
    path: PathBuf,
    file: Mutex<File>,
    count: AtomicU64,
}

impl JsonlIterationLog {
    /// Create a new log file in `dir` and write its metadata line
    ///
    /// The file name is `{backend}_{uuid-v7}.jsonl`, so logs sort by
    /// creation time.
    pub fn create(dir: &Path, backend: &str, model: &str) -> Result<Self, LlmError> {
        std::fs::create_dir_all(dir).map_err(|e| LlmError::Log(e.to_string()))?;
        let path = dir.join(format!("{}_{}.jsonl", backend, uuid::Uuid::now_v7()));
        let file = File::create(&path).map_err(|e| LlmError::Log(e.to_string()))?;

        let log = Self {
            path,
            file: Mutex::new(file),
            count: AtomicU64::new(0),
        };
        log.append(&LogEntry::Metadata {
            backend: backend.to_string(),
            model: model.to_string(),
            created_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        })?;

        debug!("Created iteration log {}", log.path.display());
        Ok(log)
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one iteration and return its number
    pub fn record(&self, model_response: &str, elapsed: Duration) -> Result<u64, LlmError> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| LlmError::Log("Iteration log lock poisoned".to_string()))?;

        // Numbering and writing happen under the same lock so lines stay ordered.
        let iteration = self.count.load(Ordering::SeqCst) + 1;
        let entry = LogEntry::Iteration {
            iteration,
            iteration_time: elapsed.as_secs_f64(),
            model_response: model_response.to_string(),
        };
        write_line(&mut file, &entry)?;
        self.count.store(iteration, Ordering::SeqCst);
        Ok(iteration)
    }

    fn append(&self, entry: &LogEntry) -> Result<(), LlmError> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| LlmError::Log("Iteration log lock poisoned".to_string()))?;
        write_line(&mut file, entry)
    }
}

impl IterationLogger for JsonlIterationLog {
    fn iteration_count(&self) -> u64 {
        self.count.load(Ordering::SeqCst)
    }

    fn log_file_path(&self) -> Option<PathBuf> {
        Some(self.path.clone())
    }
}

fn write_line(file: &mut File, entry: &LogEntry) -> Result<(), LlmError> {
    let mut line = serde_json::to_string(entry).map_err(|e| LlmError::Log(e.to_string()))?;
    line.push('\n');
    file.write_all(line.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|e| LlmError::Log(e.to_string()))
}

/// Read the metadata entries and the iterations in `(start, end]`
///
/// `end = None` leaves the range open. Blank and malformed lines are skipped.
pub fn read_log_range(path: &Path, start: u64, end: Option<u64>) -> Result<Vec<LogEntry>, LlmError> {
    let file = File::open(path).map_err(|e| LlmError::Log(format!("{}: {}", path.display(), e)))?;

    let mut entries = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| LlmError::Log(e.to_string()))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let entry: LogEntry = match serde_json::from_str(line) {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Skipping malformed log line: {}", e);
                continue;
            }
        };

        match &entry {
            LogEntry::Metadata { .. } => entries.push(entry),
            LogEntry::Iteration { iteration, .. } => {
                if *iteration > start && end.is_none_or(|end| *iteration <= end) {
                    entries.push(entry);
                }
            }
            LogEntry::Unknown => {}
        }
    }
    Ok(entries)
}

/// Render log entries as plain text
pub fn format_log_entries(entries: &[LogEntry]) -> String {
    let heavy = "=".repeat(60);
    let light = "-".repeat(60);
    let mut lines = Vec::new();

    for entry in entries {
        match entry {
            LogEntry::Metadata { backend, model, .. } => {
                lines.push(heavy.clone());
                lines.push("EXECUTION LOG - METADATA".to_string());
                lines.push(heavy.clone());
                lines.push(format!("  backend: {}", backend));
                lines.push(format!("  model: {}", model));
                lines.push(String::new());
            }
            LogEntry::Iteration {
                iteration,
                iteration_time,
                model_response,
            } => {
                lines.push(light.clone());
                lines.push(format!("ITERATION {}  ({:.2}s)", iteration, iteration_time));
                lines.push(light.clone());

                if !model_response.is_empty() {
                    lines.push("\n[Model Response]".to_string());
                    lines.push(model_response.chars().take(MAX_RESPONSE_CHARS).collect());
                    let total = model_response.chars().count();
                    if total > MAX_RESPONSE_CHARS {
                        lines.push(format!("... ({} chars total)", total));
                    }
                }
                lines.push(String::new());
            }
            LogEntry::Unknown => {}
        }
    }

    lines.join("\n")
}
