//! Storage traits and error types
//!
//! This module defines the trait interface for index backends and
//! associated error types.

use crate::storage::PageRecord;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read index {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write index {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Index {path} is not a valid page list: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// What an upsert did to the index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The link was new and the record was appended
    Inserted,
    /// The link already existed and the records were merged
    Merged,
}

/// Trait for index backend implementations
///
/// Every mutating call is a complete read-modify-write cycle against the
/// backing store, so a record is durable as soon as `upsert` returns.
pub trait IndexStore {
    /// Loads every record in insertion order
    ///
    /// A store that has never been written is empty, not an error.
    fn load(&self) -> StorageResult<Vec<PageRecord>>;

    /// Finds the record with the given link
    fn find_by_link(&self, link: &str) -> StorageResult<Option<PageRecord>> {
        Ok(self.load()?.into_iter().find(|record| record.link == link))
    }

    /// Merges `record` into an existing record with the same link, or appends it
    fn upsert(&mut self, record: PageRecord) -> StorageResult<UpsertOutcome>;

    /// Replaces the full contents of the store
    fn save(&mut self, records: &[PageRecord]) -> StorageResult<()>;
}
