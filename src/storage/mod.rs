//! Storage module for persisting harvested records
//!
//! This module handles all database operations for the harvester:
//! - SQLite database initialization and schema management
//! - Uniquely keyed record persistence (insert-if-absent)
//! - Point lookup by source URL
//! - Read-only listing for inspection tools

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{Store, StoreError, StoreResult};

use crate::TidemarkError;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Initializes or opens a record database
pub fn open_store(path: &Path) -> Result<SqliteStore, TidemarkError> {
    SqliteStore::new(path)
}

/// One harvested listing entry
///
/// A record is constructed once by the extractor and never mutated after
/// persistence. `source_url` is the unique key; `code` is derived from the
/// raw title by the code normalizer. `translated_description` stays empty
/// until enrichment succeeds, which happens before the record is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub source_url: String,
    pub code: String,
    pub title: String,
    pub image_url: String,
    pub file_size: String,
    pub posted_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub description: String,
    pub translated_description: String,
    pub actress: Vec<String>,
    pub download_url: String,
    pub scraped_at: DateTime<Utc>,
}
