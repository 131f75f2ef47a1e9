//! SQLite storage implementation

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Store, StoreResult};
use crate::storage::Record;
use crate::TidemarkError;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const RECORD_COLUMNS: &str = "source_url, code, title, image_url, file_size, posted_at, tags,
     description, translated_description, actress, download_url, scraped_at";

/// SQLite record store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates the record database at the given path
    ///
    /// Parent directories are created if missing.
    pub fn new(path: &Path) -> Result<Self, TidemarkError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        tracing::info!("Record database ready at {}", path.display());
        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, TidemarkError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn record_from_row(row: &Row<'_>) -> rusqlite::Result<Record> {
        Ok(Record {
            source_url: row.get(0)?,
            code: row.get(1)?,
            title: row.get(2)?,
            image_url: row.get(3)?,
            file_size: row.get(4)?,
            posted_at: parse_timestamp(5, row.get(5)?)?,
            tags: parse_string_list(6, row.get(6)?)?,
            description: row.get(7)?,
            translated_description: row.get(8)?,
            actress: parse_string_list(9, row.get(9)?)?,
            download_url: row.get(10)?,
            scraped_at: parse_timestamp(11, row.get(11)?)?,
        })
    }
}

fn parse_timestamp(idx: usize, value: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_string_list(idx: usize, value: String) -> rusqlite::Result<Vec<String>> {
    serde_json::from_str(&value)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

impl Store for SqliteStore {
    fn insert_if_absent(&mut self, record: &Record) -> StoreResult<bool> {
        let tags = serde_json::to_string(&record.tags)?;
        let actress = serde_json::to_string(&record.actress)?;

        let inserted = self.conn.execute(
            &format!("INSERT OR IGNORE INTO records ({RECORD_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"),
            params![
                record.source_url,
                record.code,
                record.title,
                record.image_url,
                record.file_size,
                record.posted_at.to_rfc3339(),
                tags,
                record.description,
                record.translated_description,
                actress,
                record.download_url,
                record.scraped_at.to_rfc3339(),
            ],
        )?;

        Ok(inserted > 0)
    }

    fn get_by_source_url(&self, source_url: &str) -> StoreResult<Option<Record>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM records WHERE source_url = ?1"
        ))?;

        let record = stmt
            .query_row(params![source_url], Self::record_from_row)
            .optional()?;

        Ok(record)
    }

    fn list_records(&self) -> StoreResult<Vec<Record>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM records ORDER BY posted_at DESC"
        ))?;

        let records = stmt
            .query_map([], Self::record_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn count_records(&self) -> StoreResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
