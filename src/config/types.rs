use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;

/// Main configuration structure for Tidemark
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    pub harvest: HarvestConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Site base URL without a trailing slash (e.g., "https://example.com")
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the newest-first listing page (e.g., "/new")
    #[serde(rename = "listing-path")]
    pub listing_path: String,
}

impl SiteConfig {
    /// Absolute URL of the first listing page
    pub fn listing_url(&self) -> String {
        format!("{}{}", self.base_url, self.listing_path)
    }
}

/// Harvest behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HarvestConfig {
    /// Maximum fetch attempts per page before the walk aborts
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Fixed delay between fetch attempts (milliseconds)
    #[serde(rename = "retry-delay-ms", default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Fixed delay between consecutive listing pages (milliseconds)
    #[serde(rename = "page-delay-ms", default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Maximum number of concurrent card extractions per page
    #[serde(rename = "max-workers", default = "default_max_workers")]
    pub max_workers: usize,

    /// Freshness policy determining the stopping cutoff
    #[serde(default)]
    pub freshness: Freshness,
}

/// Freshness policy: which posting dates are still considered new
///
/// The walk stops at the first record strictly older than the cutoff date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Freshness {
    /// Cutoff is yesterday: entries posted yesterday or later are kept
    #[default]
    Yesterday,
    /// Cutoff is today: only entries posted today are kept
    Today,
}

impl Freshness {
    /// Computes the cutoff date for the current instant
    pub fn cutoff_date(&self) -> NaiveDate {
        let today = Utc::now().date_naive();
        match self {
            Self::Yesterday => today - Duration::days(1),
            Self::Today => today,
        }
    }
}

/// Translation enrichment configuration
///
/// An empty API key disables enrichment entirely; records are then stored
/// with an empty translated description.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationConfig {
    /// Translation API endpoint
    #[serde(rename = "api-url", default = "default_translation_api_url")]
    pub api_url: String,

    /// API key; empty disables enrichment
    #[serde(rename = "api-key", default)]
    pub api_key: String,

    /// Target language code (e.g., "KO")
    #[serde(rename = "target-lang", default = "default_target_lang")]
    pub target_lang: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            api_url: default_translation_api_url(),
            api_key: String::new(),
            target_lang: default_target_lang(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// Periodic scheduling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Minutes between harvest cycles in watch mode
    #[serde(rename = "interval-minutes", default = "default_interval_minutes")]
    pub interval_minutes: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_minutes: default_interval_minutes(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    300
}

fn default_page_delay_ms() -> u64 {
    50
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_max_workers() -> usize {
    5
}

fn default_translation_api_url() -> String {
    "https://api-free.deepl.com/v2/translate".to_string()
}

fn default_target_lang() -> String {
    "KO".to_string()
}

fn default_interval_minutes() -> u64 {
    60
}
