//! Pagination walker
//!
//! Drives the page fetcher across consecutive listing pages, newest first,
//! extracting one record per card fragment. Fragments within a page are
//! extracted concurrently by a bounded pool, but the stopping rule is
//! evaluated on the ordered sequence: the first record in document order
//! whose posting date is strictly before the cutoff stops the walk.

use crate::config::{HarvestConfig, SiteConfig};
use crate::harvest::extract::extract_record;
use crate::harvest::fetcher::{FetchError, FetchedPage, PageFetcher};
use crate::storage::Record;
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use scraper::{Html, Selector};
use std::time::Duration;

/// CSS selector for one listing card fragment
const CARD_SELECTOR: &str = "div.card.mb-3";

/// CSS selector for the next-page link
const NEXT_PAGE_SELECTOR: &str = "nav.pagination a.pagination-next";

/// Why the walk stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A record older than the cutoff was found
    BoundaryReached,
    /// The listing ran out of pages
    LastPage,
}

/// Result of a completed walk
#[derive(Debug)]
pub struct WalkOutcome {
    /// Accumulated records in source document order (newest first,
    /// oldest appended last), spanning possibly multiple pages
    pub records: Vec<Record>,
    /// Number of listing pages fetched
    pub pages_visited: u32,
    /// Why the walk terminated
    pub stop: StopReason,
}

enum WalkState {
    Fetch(String),
    Extract(FetchedPage),
    Stopped(StopReason),
}

/// Walks the listing from its first page until the cutoff boundary or the
/// last page, returning the ordered batch of fresh records
///
/// A fetch failure (after the fetcher's bounded retries) aborts the walk
/// and surfaces the error; no records from the failed walk are returned.
pub async fn walk_listing(
    fetcher: &dyn PageFetcher,
    site: &SiteConfig,
    harvest: &HarvestConfig,
    cutoff: NaiveDate,
) -> Result<WalkOutcome, FetchError> {
    let page_delay = Duration::from_millis(harvest.page_delay_ms);

    let mut records = Vec::new();
    let mut pages_visited = 0u32;
    let mut state = WalkState::Fetch(site.listing_url());

    let stop = loop {
        state = match state {
            WalkState::Fetch(url) => {
                if pages_visited > 0 {
                    tokio::time::sleep(page_delay).await;
                }
                tracing::info!("Fetching listing page: {}", url);
                let page = fetcher.fetch(&url).await?;
                pages_visited += 1;
                WalkState::Extract(page)
            }

            WalkState::Extract(page) => {
                let scan = scan_page(&page.body);
                tracing::debug!(
                    "Page {} has {} card fragments",
                    page.url,
                    scan.fragments.len()
                );

                let extracted =
                    extract_fragments(scan.fragments, &site.base_url, harvest.max_workers).await;

                let mut boundary = false;
                for record in extracted.into_iter().flatten() {
                    if record.posted_at.date_naive() < cutoff {
                        tracing::info!(
                            "Boundary record {} posted {}, stopping walk",
                            record.code,
                            record.posted_at.date_naive()
                        );
                        boundary = true;
                        break;
                    }
                    records.push(record);
                }

                if boundary {
                    WalkState::Stopped(StopReason::BoundaryReached)
                } else {
                    match scan.next_page {
                        Some(href) => WalkState::Fetch(resolve_next_page_url(&href, site)),
                        None => {
                            tracing::info!("Reached last listing page");
                            WalkState::Stopped(StopReason::LastPage)
                        }
                    }
                }
            }

            WalkState::Stopped(reason) => break reason,
        };
    };

    Ok(WalkOutcome {
        records,
        pages_visited,
        stop,
    })
}

struct PageScan {
    /// Outer HTML of each card fragment, in document order
    fragments: Vec<String>,
    /// Raw href of the next-page link, if any
    next_page: Option<String>,
}

/// Collects card fragments and the next-page link from one listing page
///
/// The parsed document stays local to this function; only owned strings
/// cross back into async context.
fn scan_page(body: &str) -> PageScan {
    let document = Html::parse_document(body);

    let fragments = match Selector::parse(CARD_SELECTOR) {
        Ok(selector) => document.select(&selector).map(|el| el.html()).collect(),
        Err(_) => Vec::new(),
    };

    let next_page = Selector::parse(NEXT_PAGE_SELECTOR)
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .and_then(|el| el.value().attr("href"))
                .map(str::to_string)
        });

    PageScan {
        fragments,
        next_page,
    }
}

/// Extracts card fragments on a bounded worker pool, preserving document
/// order in the returned sequence regardless of completion order
async fn extract_fragments(
    fragments: Vec<String>,
    base_url: &str,
    max_workers: usize,
) -> Vec<Option<Record>> {
    stream::iter(fragments.into_iter().map(|html| {
        let base = base_url.to_string();
        tokio::task::spawn_blocking(move || extract_record(&html, &base))
    }))
    .buffered(max_workers.max(1))
    .map(|joined| joined.unwrap_or(None))
    .collect()
    .await
}

/// Resolves the next-page link against the site configuration
///
/// A value carrying its own scheme is used as-is; a bare query string is
/// appended to the listing path; anything else is prefixed with the site
/// base.
fn resolve_next_page_url(href: &str, site: &SiteConfig) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else if href.starts_with('?') {
        format!("{}{}", site.listing_url(), href)
    } else {
        format!("{}{}", site.base_url, href)
    }
}
