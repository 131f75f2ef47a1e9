//! Harvest pipeline: walk the listing, extract records, persist new ones
//!
//! The pipeline is driven by [`run_once`], which performs one complete
//! walk-and-persist cycle:
//! - The walker fetches listing pages newest-first and hands each card
//!   fragment to the extractor (concurrently, in document order)
//! - The walk stops at the first record older than the freshness cutoff
//! - The orchestrator commits the batch oldest-first against the dedup
//!   store, enriching descriptions with a translation where configured

mod codes;
mod extract;
mod fetcher;
mod persist;
mod pipeline;
mod useragent;
mod walker;

pub use codes::normalize_title;
pub use extract::extract_record;
pub use fetcher::{FetchError, FetchedPage, HttpFetcher, PageFetcher};
pub use persist::{persist_batch, PersistReport};
pub use pipeline::{run_once, RunReport};
pub use useragent::pick_user_agent;
pub use walker::{walk_listing, StopReason, WalkOutcome};
