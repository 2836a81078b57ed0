//! Cache key derivation

use lexcite_domain::SchemaKind;
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;
use std::time::UNIX_EPOCH;

/// Hex characters kept from the SHA-256 digest
const KEY_LEN: usize = 16;

/// Deterministic identifier of one cache entry
///
/// Valid only for the exact `(path, mtime, schema)` triple that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive a key from its raw components
    ///
    /// # Examples
    ///
    /// ```
    /// use lexcite_store::CacheKey;
    ///
    /// let a = CacheKey::derive("/docs/a.txt", "1700000000.000000000", "general");
    /// let b = CacheKey::derive("/docs/a.txt", "1700000000.000000000", "general");
    /// assert_eq!(a, b);
    /// assert_eq!(a.as_str().len(), 16);
    /// ```
    pub fn derive(file_path: &str, mtime: &str, schema_name: &str) -> Self {
        let raw = format!("{}|{}|{}", file_path, mtime, schema_name);
        let digest = Sha256::digest(raw.as_bytes());
        let mut hex = hex::encode(digest);
        hex.truncate(KEY_LEN);
        Self(hex)
    }

    /// Derive the key for a file as it currently is on disk
    ///
    /// The path is made absolute first. A file whose metadata cannot be read
    /// uses mtime `0`, so it never collides with a readable version of itself.
    pub fn for_file(file_path: &Path, schema: &SchemaKind) -> Self {
        let absolute = std::path::absolute(file_path).unwrap_or_else(|_| file_path.to_path_buf());
        Self::derive(
            &absolute.to_string_lossy(),
            &mtime_string(file_path),
            schema.as_str(),
        )
    }

    /// The key as a hex string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the entry in the cache directory
    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Modification time as `seconds.nanoseconds`, or `0` when unavailable
fn mtime_string(path: &Path) -> String {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| format!("{}.{:09}", d.as_secs(), d.subsec_nanos()))
        .unwrap_or_else(|| "0".to_string())
}
