//! Lexcite Extraction Cache
//!
//! Persists [`ExtractionResult`](lexcite_domain::ExtractionResult)s across
//! sessions so unchanged documents are not re-extracted.
//!
//! # Layout
//!
//! One JSON file per entry, named by the first 16 hex characters of
//! `SHA-256("{absolute path}|{mtime}|{schema}")`. Because the key embeds the
//! file's modification time, editing a file simply stops matching the old
//! entry: a stale entry looks exactly like one that was never written.
//!
//! # Failure policy
//!
//! [`ExtractionCache::get`] and [`ExtractionCache::put`] never fail the
//! caller. Any I/O or decode error degrades to a miss (or a skipped write)
//! and extraction proceeds uncached. This trades cache correctness for
//! pipeline availability. The fallible [`ExtractionCache::try_get`] and
//! [`ExtractionCache::try_put`] are available when the error matters.
//!
//! # Concurrency
//!
//! Entries are written to a temporary file in the cache directory and then
//! renamed over the target, so concurrent readers never observe a partial
//! entry. Writers for the same key race; the last rename wins.
//!
//! # Examples
//!
//! ```no_run
//! use lexcite_domain::{ExtractionResult, SchemaKind};
//! use lexcite_store::ExtractionCache;
//! use std::path::Path;
//!
//! let cache = ExtractionCache::open("/tmp/lexcite-cache")?;
//! let path = Path::new("contract.txt");
//!
//! if cache.get(path, &SchemaKind::General).is_none() {
//!     let result = ExtractionResult::success("contract.txt", vec![]);
//!     cache.put(path, &SchemaKind::General, &result);
//! }
//! # Ok::<(), lexcite_store::CacheError>(())
//! ```

#![warn(missing_docs)]

mod cache;
mod key;

pub use cache::ExtractionCache;
pub use key::CacheKey;

use thiserror::Error;

/// Errors that can occur during cache operations
#[derive(Error, Debug)]
pub enum CacheError {
    /// Filesystem error
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Entry could not be encoded or decoded
    #[error("Cache entry is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}
