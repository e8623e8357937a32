//! Persisted watermark for incremental sync runs.
//!
//! The watermark is the `updated_at` horizon of the previously processed
//! window. It lives in a plain file holding exactly one RFC 3339 timestamp,
//! so a run only fetches highlights changed since the last successful run.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::error::{Result, SyncError};

/// Storage seam for the watermark, so tests can swap in an in-memory fake.
pub trait RunStateStore {
    /// Read the persisted watermark. `None` means no usable watermark exists
    /// and the next fetch should cover all history.
    fn load(&self) -> Option<DateTime<Utc>>;

    /// Overwrite the persisted watermark.
    fn save(&self, ts: DateTime<Utc>) -> Result<()>;
}

/// File-backed store: one RFC 3339 string, nothing else.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RunStateStore for FileStateStore {
    /// A missing file or unparseable content degrades to `None` (full
    /// backfill) rather than failing the run.
    fn load(&self) -> Option<DateTime<Utc>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    "Watermark file {} not found; will fetch all history",
                    self.path.display()
                );
                return None;
            }
            Err(e) => {
                tracing::warn!("Failed to read watermark file {}: {}", self.path.display(), e);
                return None;
            }
        };

        match DateTime::parse_from_rfc3339(content.trim()) {
            Ok(ts) => Some(ts.with_timezone(&Utc)),
            Err(e) => {
                tracing::warn!(
                    "Invalid watermark in {}: {}; will fetch all history",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    /// Writes to a sibling temp file and renames it into place, so a crash
    /// mid-write cannot leave a half-written timestamp behind.
    fn save(&self, ts: DateTime<Utc>) -> Result<()> {
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, ts.to_rfc3339())
            .and_then(|_| fs::rename(&tmp, &self.path))
            .map_err(|e| {
                SyncError::Persistence(format!(
                    "failed to write watermark to {}: {}",
                    self.path.display(),
                    e
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn temp_store() -> FileStateStore {
        let path = std::env::temp_dir().join(format!("vocab-watermark-{}", uuid::Uuid::new_v4()));
        FileStateStore::new(path)
    }

    #[test]
    fn load_after_save_round_trips() {
        let store = temp_store();
        let ts = "2024-03-01T12:30:00Z".parse::<DateTime<Utc>>().unwrap();
        store.save(ts).unwrap();
        assert_eq!(store.load(), Some(ts));
    }

    #[test]
    fn save_overwrites_previous_watermark() {
        let store = temp_store();
        let first = "2024-03-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let second = "2024-04-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        store.save(first).unwrap();
        store.save(second).unwrap();
        assert_eq!(store.load(), Some(second));
    }

    #[test]
    fn load_missing_file_returns_none() {
        assert_eq!(temp_store().load(), None);
    }

    #[test]
    fn load_garbage_content_returns_none() {
        let store = temp_store();
        std::fs::write(&store.path, "not a timestamp").unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn load_tolerates_surrounding_whitespace() {
        let store = temp_store();
        std::fs::write(&store.path, "2024-03-01T12:30:00+00:00\n").unwrap();
        let ts = "2024-03-01T12:30:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(store.load(), Some(ts));
    }
}
