//! Database schema definitions
//!
//! The `records` table is keyed uniquely by `source_url`; the secondary
//! indexes on `posted_at` and `code` exist for external querying, not for
//! the harvest control flow.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_url TEXT NOT NULL UNIQUE,
    code TEXT NOT NULL,
    title TEXT NOT NULL,
    image_url TEXT NOT NULL,
    file_size TEXT NOT NULL,
    posted_at TEXT NOT NULL,
    tags TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    translated_description TEXT NOT NULL DEFAULT '',
    actress TEXT NOT NULL,
    download_url TEXT NOT NULL,
    scraped_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_records_posted_at ON records(posted_at);
CREATE INDEX IF NOT EXISTS idx_records_code ON records(code);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)
}
