//! Storage traits and error types

use crate::storage::Record;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for record storage backends
///
/// The backend enforces `source_url` uniqueness at the storage layer.
/// Callers may pre-check for duplicates with [`Store::get_by_source_url`]
/// as an optimization, but [`Store::insert_if_absent`] is the final
/// arbiter either way.
pub trait Store {
    /// Inserts a record unless one with the same `source_url` exists
    ///
    /// Returns `true` if the record was newly inserted, `false` if a row
    /// with that `source_url` already existed. A repeated insertion is a
    /// no-op, never an error.
    fn insert_if_absent(&mut self, record: &Record) -> StoreResult<bool>;

    /// Looks up a record by its source URL
    fn get_by_source_url(&self, source_url: &str) -> StoreResult<Option<Record>>;

    /// Returns all stored records ordered by posting date, newest first
    fn list_records(&self) -> StoreResult<Vec<Record>>;

    /// Counts the stored records
    fn count_records(&self) -> StoreResult<u64>;
}
