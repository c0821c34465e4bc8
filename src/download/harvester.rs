//! The fetch, process and persist loop.

use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use indicatif::ProgressBar;
use rand::Rng;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::api::{Fetcher, Listing, PageRequest};
use crate::config::Config;
use crate::download::batch::{process_batch, BatchContext};
use crate::download::state::{HarvestSummary, StopReason};
use crate::error::{Error, Result};
use crate::fs::{ensure_dir, Cursor, CursorStore};
use crate::media::{ContentFilter, MediaPolicy};

/// Pages through a subreddit listing until it is exhausted, a page limit is
/// hit, or a stop is requested, persisting the cursor after every page.
pub struct Harvester {
    fetcher: Arc<dyn Fetcher>,
    request: PageRequest,
    store: CursorStore,
    batch: BatchContext,
    page_delay_ms: RangeInclusive<u64>,
    retry_delay: Duration,
    max_batches: Option<u64>,
    cancel: CancellationToken,
    progress: Option<ProgressBar>,
}

impl Harvester {
    pub fn new(config: &Config, fetcher: Arc<dyn Fetcher>, cancel: CancellationToken) -> Result<Self> {
        let filter = ContentFilter::from_config(&config.filter)?;
        let policy = MediaPolicy::new(filter, config.options.allow_redgifs);
        let root: PathBuf = config.options.download_directory.clone();
        let [min_delay, max_delay] = config.options.page_delay_ms;

        Ok(Self {
            request: PageRequest::from_config(config),
            store: CursorStore::new(config.cursor_path()),
            batch: BatchContext {
                fetcher: fetcher.clone(),
                policy: Arc::new(policy),
                root,
                max_concurrent_items: config.options.max_concurrent_items,
                show_downloads: config.options.show_downloads,
            },
            fetcher,
            page_delay_ms: min_delay..=max_delay.max(min_delay),
            retry_delay: Duration::from_secs(config.options.retry_delay_secs),
            max_batches: config.options.max_batches,
            cancel,
            progress: None,
        })
    }

    /// Report progress on `bar` after every page.
    pub fn with_progress(mut self, bar: ProgressBar) -> Self {
        self.progress = Some(bar);
        self
    }

    /// Run until stopped. Per-post and per-page failures are absorbed; only
    /// an unusable download root or cursor file ends the run with an error.
    pub async fn run(&self) -> Result<HarvestSummary> {
        ensure_dir(&self.batch.root).await?;
        let mut cursor = self.store.load().await?;
        tracing::info!(
            "Harvesting {} of r/{} from cursor {}",
            if self.request.is_search() { "search results" } else { "the listing" },
            self.request.subreddit,
            cursor
        );

        let mut summary = HarvestSummary::default();
        let mut pause = Duration::ZERO;

        let stop = loop {
            if !self.sleep(pause).await {
                break StopReason::Cancelled;
            }
            if let Some(max) = self.max_batches {
                if summary.batches >= max {
                    break StopReason::BatchLimit;
                }
            }

            let listing = match self.fetch_page(&cursor).await {
                Ok(listing) => listing,
                Err(e) => {
                    tracing::warn!("Failed to fetch page after {}: {}", cursor, e);
                    summary.mark_fetch_failed();
                    self.persist(&cursor).await;
                    pause = self.retry_delay;
                    continue;
                }
            };

            let children = &listing.data.children;
            if children.is_empty() {
                tracing::info!("Listing exhausted after {}", cursor);
                break StopReason::EndOfResults;
            }
            tracing::debug!(
                "Got {} posts, API cursor {:?}",
                children.len(),
                listing.data.after
            );

            let report = process_batch(&self.batch, children, &self.cancel).await;
            // A page where nothing could name a position is skipped via the
            // API's own token, unless the stop request cut it short.
            let next = match (&report.next_cursor, report.cancelled) {
                (Some(next), _) => Some(next.clone()),
                (None, false) => listing.data.after.clone().map(Cursor::new),
                (None, true) => None,
            };
            if let Some(next) = next {
                cursor = next;
            }

            summary.add_batch(&report);
            self.update_progress(&summary);
            tracing::info!(
                "Page {}: {} posts, {} saved, {} existing, {} failed",
                summary.batches,
                report.items_total,
                report.saved,
                report.already_present,
                report.failed
            );

            self.persist(&cursor).await;
            pause = self.page_delay();
        };

        summary.final_cursor = cursor;
        summary.stop_reason = stop;
        tracing::info!("Harvest stopped: {}", stop);
        Ok(summary)
    }

    async fn fetch_page(&self, cursor: &Cursor) -> Result<Listing> {
        let url = self.request.url(cursor)?;
        let page: Value = self.fetcher.fetch_json(url.as_str()).await?;
        serde_json::from_value(page).map_err(|e| Error::MalformedPage(e.to_string()))
    }

    /// Save the cursor. A failed save is logged; the next page retries it.
    async fn persist(&self, cursor: &Cursor) {
        if let Err(e) = self.store.save(cursor).await {
            tracing::error!(
                "Failed to save cursor to {}: {}",
                self.store.path().display(),
                e
            );
        }
    }

    fn page_delay(&self) -> Duration {
        let ms = rand::thread_rng().gen_range(self.page_delay_ms.clone());
        Duration::from_millis(ms)
    }

    /// Sleep unless cancelled first. Returns `false` on cancellation.
    async fn sleep(&self, duration: Duration) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        if duration.is_zero() {
            return true;
        }
        tokio::select! {
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(duration) => true,
        }
    }

    fn update_progress(&self, summary: &HarvestSummary) {
        if let Some(bar) = &self.progress {
            bar.set_message(format!(
                "{} pages | {} saved | {} existing | {} failed",
                summary.batches, summary.saved, summary.already_present, summary.failed
            ));
        }
    }
}
