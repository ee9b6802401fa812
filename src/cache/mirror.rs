//! Best-effort durable copy of the resolution cache.
//!
//! Snapshots live under a single namespace key. Callers treat every error here as
//! non-fatal: a failed write only means the next process starts colder.

use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::error::{StorageError, StorageResult};
use super::types::{CacheEntry, now_millis};

/// Namespace key all cache snapshots are stored under.
pub const CACHE_NAMESPACE: &str = "ingredient_cache_v1";

/// Persists and reloads cache snapshots.
pub trait CacheMirror<V>: Send + Sync {
    /// Replaces the stored snapshot with `entries`.
    fn persist(&self, entries: &[CacheEntry<V>]) -> StorageResult<()>;
    /// Reads the stored snapshot (empty if none exists yet).
    fn load(&self) -> StorageResult<Vec<CacheEntry<V>>>;
}

#[derive(Serialize)]
struct SnapshotRef<'a, V> {
    namespace: &'static str,
    saved_at: i64,
    entries: &'a [CacheEntry<V>],
}

#[derive(Deserialize)]
struct Snapshot<V> {
    namespace: String,
    entries: Vec<CacheEntry<V>>,
}

#[derive(Debug, Clone)]
/// JSON snapshot file at `<dir>/ingredient_cache_v1.json`, replaced atomically.
pub struct FileCacheMirror {
    path: PathBuf,
}

impl FileCacheMirror {
    /// Creates a mirror rooted at `dir` (created lazily on first write).
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{CACHE_NAMESPACE}.json")),
        }
    }

    /// Returns the snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<V> CacheMirror<V> for FileCacheMirror
where
    V: Serialize + DeserializeOwned + Send + Sync,
{
    fn persist(&self, entries: &[CacheEntry<V>]) -> StorageResult<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer(
                &mut writer,
                &SnapshotRef {
                    namespace: CACHE_NAMESPACE,
                    saved_at: now_millis(),
                    entries,
                },
            )?;
            writer.flush()?;
        }
        tmp.persist(&self.path).map_err(|e| StorageError::Io(e.error))?;
        Ok(())
    }

    fn load(&self) -> StorageResult<Vec<CacheEntry<V>>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(&self.path)?;
        let snapshot: Snapshot<V> = serde_json::from_reader(BufReader::new(file))?;
        if snapshot.namespace != CACHE_NAMESPACE {
            return Err(StorageError::NamespaceMismatch {
                path: self.path.clone(),
                found: snapshot.namespace,
                expected: CACHE_NAMESPACE,
            });
        }
        Ok(snapshot.entries)
    }
}
