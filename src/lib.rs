//! Tidemark: an incremental listing harvester
//!
//! This crate walks a paginated listing site from its newest page, extracts
//! one record per listing card, stops at the first entry older than the
//! configured freshness cutoff, and commits the new records to a uniquely
//! keyed SQLite store. Descriptions are optionally enriched with a
//! translation before persistence.

pub mod config;
pub mod harvest;
pub mod output;
pub mod schedule;
pub mod storage;
pub mod translate;

use thiserror::Error;

/// Main error type for Tidemark operations
#[derive(Debug, Error)]
pub enum TidemarkError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] harvest::FetchError),

    #[error("Store error: {0}")]
    Store(#[from] storage::StoreError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Translation error: {0}")]
    Translation(#[from] translate::TranslationError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Tidemark operations
pub type Result<T> = std::result::Result<T, TidemarkError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use harvest::{run_once, RunReport};
pub use storage::{Record, SqliteStore, Store};
