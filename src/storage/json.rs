//! JSON file index store
//!
//! The index is a single JSON array of page records, pretty-printed with a
//! four-space indent. Saves are written to a sibling temporary file and
//! renamed over the target so a crash mid-write leaves the previous index
//! intact.

use crate::storage::merge::{merge_records, ScalarMerge};
use crate::storage::traits::{IndexStore, StorageError, StorageResult, UpsertOutcome};
use crate::storage::PageRecord;
use serde::Serialize;
use std::fs::{OpenOptions, Permissions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// An index persisted as one JSON file
#[derive(Debug, Clone)]
pub struct JsonIndexStore {
    path: PathBuf,
    policy: ScalarMerge,
}

impl JsonIndexStore {
    /// Creates a store for the index at `path`
    ///
    /// Nothing is read or written until the first operation.
    pub fn new(path: impl Into<PathBuf>, policy: ScalarMerge) -> Self {
        Self {
            path: path.into(),
            policy,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Permissions the index file should keep across saves
    ///
    /// An existing index keeps its mode. A new one gets the mode of a plain
    /// file creation, so the process umask applies.
    fn target_permissions(&self) -> std::io::Result<Permissions> {
        match std::fs::metadata(&self.path) {
            Ok(metadata) => Ok(metadata.permissions()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let file = OpenOptions::new()
                    .write(true)
                    .create(true)
                    .open(&self.path)?;
                Ok(file.metadata()?.permissions())
            }
            Err(e) => Err(e),
        }
    }

    fn write_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl IndexStore for JsonIndexStore {
    fn load(&self) -> StorageResult<Vec<PageRecord>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Index {} does not exist yet", self.path.display());
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn upsert(&mut self, record: PageRecord) -> StorageResult<UpsertOutcome> {
        let mut records = self.load()?;

        let outcome = match records.iter_mut().find(|r| r.link == record.link) {
            Some(existing) => {
                merge_records(existing, record, self.policy);
                UpsertOutcome::Merged
            }
            None => {
                records.push(record);
                UpsertOutcome::Inserted
            }
        };

        self.save(&records)?;
        Ok(outcome)
    }

    fn save(&mut self, records: &[PageRecord]) -> StorageResult<()> {
        let dir = self.parent_dir().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| self.write_error(e))?;

        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        records.serialize(&mut serializer)?;
        buffer.push(b'\n');

        let mut file = NamedTempFile::new_in(&dir).map_err(|e| self.write_error(e))?;
        file.write_all(&buffer).map_err(|e| self.write_error(e))?;
        file.as_file().sync_all().map_err(|e| self.write_error(e))?;

        // Temp files are created owner-only
        let permissions = self.target_permissions().map_err(|e| self.write_error(e))?;
        file.as_file()
            .set_permissions(permissions)
            .map_err(|e| self.write_error(e))?;
        file.persist(&self.path)
            .map_err(|e| self.write_error(e.error))?;

        tracing::trace!(
            "Wrote {} records to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }
}
