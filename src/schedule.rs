//! Periodic harvest scheduling
//!
//! Re-invokes the harvest pipeline on a fixed interval. The first cycle
//! runs immediately; a failed cycle is logged and the loop keeps going.

use crate::config::Config;
use crate::harvest::{run_once, PageFetcher};
use crate::storage::Store;
use crate::translate::Translator;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Runs harvest cycles forever at the configured interval
pub async fn run_forever<S: Store>(
    fetcher: &dyn PageFetcher,
    store: &Mutex<S>,
    translator: Option<&dyn Translator>,
    config: &Config,
) {
    let period = Duration::from_secs(config.schedule.interval_minutes * 60);
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(
        "Scheduler started, harvesting every {} minutes",
        config.schedule.interval_minutes
    );

    loop {
        interval.tick().await;

        match run_once(fetcher, store, translator, config).await {
            Ok(report) => {
                tracing::info!(
                    "Scheduled harvest done: {} found, {} inserted, {} duplicates",
                    report.found,
                    report.inserted,
                    report.duplicates
                );
            }
            Err(e) => {
                tracing::error!("Scheduled harvest failed: {}", e);
            }
        }
    }
}
