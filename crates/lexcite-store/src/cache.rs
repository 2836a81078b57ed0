//! File-backed extraction cache

use crate::key::CacheKey;
use crate::CacheError;
use lexcite_domain::{ExtractionResult, SchemaKind};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// JSON-file cache of extraction results
///
/// Safe to share between tasks (`Arc<ExtractionCache>`): it holds no
/// in-memory state beyond its directory.
#[derive(Debug, Clone)]
pub struct ExtractionCache {
    dir: PathBuf,
}

impl ExtractionCache {
    /// Open (and create if needed) a cache rooted at `dir`
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory holding the entries
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Look up the result for the file as it is now on disk
    ///
    /// Returns `None` on a miss, on a stale entry (the file changed since the
    /// write) and on any read or decode failure.
    pub fn get(&self, file_path: &Path, schema: &SchemaKind) -> Option<ExtractionResult> {
        match self.try_get(file_path, schema) {
            Ok(Some(result)) => {
                debug!("Cache hit for {} ({})", file_path.display(), schema);
                Some(result)
            }
            Ok(None) => {
                debug!("Cache miss for {} ({})", file_path.display(), schema);
                None
            }
            Err(e) => {
                debug!("Cache read failed for {}: {}", file_path.display(), e);
                None
            }
        }
    }

    /// Fallible lookup
    pub fn try_get(
        &self,
        file_path: &Path,
        schema: &SchemaKind,
    ) -> Result<Option<ExtractionResult>, CacheError> {
        let entry = self.entry_path(&CacheKey::for_file(file_path, schema));
        let contents = match std::fs::read_to_string(&entry) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Store a result, replacing any entry under the same key
    ///
    /// Failures are logged and otherwise ignored.
    pub fn put(&self, file_path: &Path, schema: &SchemaKind, result: &ExtractionResult) {
        if let Err(e) = self.try_put(file_path, schema, result) {
            debug!("Cache write failed for {}: {}", file_path.display(), e);
        }
    }

    /// Fallible store; returns the key the entry was written under
    pub fn try_put(
        &self,
        file_path: &Path,
        schema: &SchemaKind,
        result: &ExtractionResult,
    ) -> Result<CacheKey, CacheError> {
        let key = CacheKey::for_file(file_path, schema);
        let json = serde_json::to_vec(result)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.entry_path(&key)).map_err(|e| e.error)?;

        debug!("Cached {} ({}) as {}", file_path.display(), schema, key);
        Ok(key)
    }

    /// Remove every entry; returns how many were deleted
    ///
    /// Best-effort: entries that cannot be removed are skipped.
    pub fn clear(&self) -> usize {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Cache clear could not list {}: {}", self.dir.display(), e);
                return 0;
            }
        };

        let mut removed = 0;
        for path in entries.flatten().map(|e| e.path()).filter(|p| is_entry(p)) {
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => debug!("Could not remove {}: {}", path.display(), e),
            }
        }
        removed
    }

    /// Number of entries currently on disk
    pub fn len(&self) -> usize {
        std::fs::read_dir(&self.dir)
            .map(|entries| entries.flatten().filter(|e| is_entry(&e.path())).count())
            .unwrap_or(0)
    }

    /// True when the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }
}

fn is_entry(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}
