//! One full walk-and-persist cycle
//!
//! This is the scheduler-facing entry point: a single call walks the
//! listing up to the freshness boundary and commits the fresh records.

use crate::config::Config;
use crate::harvest::fetcher::PageFetcher;
use crate::harvest::persist::persist_batch;
use crate::harvest::walker::{walk_listing, StopReason};
use crate::storage::Store;
use crate::translate::Translator;
use crate::TidemarkError;
use chrono::NaiveDate;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Aggregate counters for one harvest cycle
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Cutoff date the walk stopped at
    pub cutoff: NaiveDate,
    /// Listing pages fetched
    pub pages_visited: u32,
    /// Why the walk stopped
    pub stop: StopReason,
    /// Total candidate records found
    pub found: usize,
    /// Records newly inserted
    pub inserted: usize,
    /// Records rejected as duplicates
    pub duplicates: usize,
    /// Records persisted without a duplicate pre-check
    pub checks_skipped: usize,
    /// Records enriched with a translation
    pub translated: usize,
    /// Records whose store operation failed
    pub store_failures: usize,
    /// Wall-clock duration of the cycle
    pub elapsed: Duration,
}

/// Performs one full walk-and-persist cycle
///
/// A fetch failure aborts the cycle with an error and commits nothing;
/// translation and per-record store failures are recovered inline and
/// only reflected in the report counters.
pub async fn run_once<S: Store>(
    fetcher: &dyn PageFetcher,
    store: &Mutex<S>,
    translator: Option<&dyn Translator>,
    config: &Config,
) -> Result<RunReport, TidemarkError> {
    let started = Instant::now();
    let cutoff = config.harvest.freshness.cutoff_date();

    tracing::info!(
        "Starting harvest from {} (cutoff {})",
        config.site.listing_url(),
        cutoff
    );

    let walk = walk_listing(fetcher, &config.site, &config.harvest, cutoff).await?;
    tracing::info!(
        "Walk finished: {} candidate records across {} pages ({:?})",
        walk.records.len(),
        walk.pages_visited,
        walk.stop
    );

    let pages_visited = walk.pages_visited;
    let stop = walk.stop;
    let persist = persist_batch(store, translator, walk.records).await;
    let elapsed = started.elapsed();

    let report = RunReport {
        cutoff,
        pages_visited,
        stop,
        found: persist.found,
        inserted: persist.inserted,
        duplicates: persist.duplicates,
        checks_skipped: persist.checks_skipped,
        translated: persist.translated,
        store_failures: persist.store_failures,
        elapsed,
    };

    tracing::info!(
        "Harvest cycle complete: {} found, {} inserted, {} duplicates in {:.1?}",
        report.found,
        report.inserted,
        report.duplicates,
        report.elapsed
    );

    Ok(report)
}
