//! Persistence orchestrator
//!
//! Commits a walked batch to the dedup store. The walker accumulates
//! records newest-first, so the batch is committed in reverse (ascending
//! chronological order). Duplicate lookups are performed per record only
//! until the first successful insert; after that boundary the store's own
//! uniqueness constraint absorbs any remaining logical duplicates, so the
//! pre-check is skipped. All store mutation goes through one mutex; a
//! lookup never holds it across the translation call.

use crate::storage::{Record, Store};
use crate::translate::Translator;
use std::sync::{Mutex, PoisonError};

/// Counters reported for one persistence pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistReport {
    /// Total candidate records in the batch
    pub found: usize,
    /// Records newly inserted
    pub inserted: usize,
    /// Records rejected as duplicates (pre-checked or absorbed by the
    /// store's uniqueness constraint)
    pub duplicates: usize,
    /// Records for which the duplicate pre-check was skipped
    pub checks_skipped: usize,
    /// Records enriched with a translated description
    pub translated: usize,
    /// Records whose store operation failed
    pub store_failures: usize,
}

/// Commits a walker batch to the store, oldest records first
///
/// `batch` is expected in walker order (newest first). Translation
/// enrichment runs per record before its insert; a translation failure
/// leaves the translated description empty and never blocks persistence.
/// A store failure is counted and skipped; the rest of the batch still
/// commits.
pub async fn persist_batch<S: Store>(
    store: &Mutex<S>,
    translator: Option<&dyn Translator>,
    batch: Vec<Record>,
) -> PersistReport {
    let mut report = PersistReport {
        found: batch.len(),
        ..PersistReport::default()
    };

    let mut boundary_found = false;

    for mut record in batch.into_iter().rev() {
        if boundary_found {
            report.checks_skipped += 1;
        } else {
            let existing = {
                // A poisoned lock is recovered: the store's uniqueness
                // constraint keeps it consistent whatever a panicking
                // holder left behind
                let guard = store.lock().unwrap_or_else(PoisonError::into_inner);
                guard.get_by_source_url(&record.source_url)
            };
            match existing {
                Ok(Some(_)) => {
                    tracing::debug!("Duplicate record skipped: {}", record.code);
                    report.duplicates += 1;
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("Duplicate check failed for {}: {}", record.code, e);
                    report.store_failures += 1;
                    continue;
                }
            }
        }

        if !record.description.is_empty() {
            if let Some(translator) = translator {
                match translator.translate(&record.description).await {
                    Ok(text) => {
                        record.translated_description = text;
                        report.translated += 1;
                    }
                    Err(e) => {
                        tracing::warn!("Translation failed for {}: {}", record.code, e);
                    }
                }
            }
        }

        let result = {
            let mut guard = store.lock().unwrap_or_else(PoisonError::into_inner);
            guard.insert_if_absent(&record)
        };
        match result {
            Ok(true) => {
                tracing::info!("Stored record {}", record.code);
                report.inserted += 1;
                boundary_found = true;
            }
            Ok(false) => {
                tracing::debug!("Store absorbed duplicate: {}", record.code);
                report.duplicates += 1;
            }
            Err(e) => {
                tracing::warn!("Failed to store {}: {}", record.code, e);
                report.store_failures += 1;
            }
        }
    }

    report
}
