//! Per-item, per-batch and per-run outcome tracking.

use std::fmt;
use std::path::PathBuf;

use crate::fs::Cursor;
use crate::media::SkipReason;

/// Result of one media download. Failures are values, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Written to disk.
    Saved(PathBuf),
    /// Target file existed before; nothing fetched.
    AlreadyPresent(PathBuf),
    /// Transport or disk failure, swallowed.
    Failed { url: String, reason: String },
}

/// Download counters for one post.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ItemReport {
    pub saved: u64,
    pub already_present: u64,
    pub failed: u64,
}

impl ItemReport {
    pub fn record(&mut self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Saved(_) => self.saved += 1,
            DownloadOutcome::AlreadyPresent(_) => self.already_present += 1,
            DownloadOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

/// What happened to one listing child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Media extracted and every candidate attempted.
    Processed(ItemReport),
    /// Nothing to download, for the given reason.
    Skipped(SkipReason),
    /// The child could not be decoded as a post at all.
    Undecodable(String),
}

impl fmt::Display for ItemOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemOutcome::Processed(r) => write!(
                f,
                "{} saved, {} existing, {} failed",
                r.saved, r.already_present, r.failed
            ),
            ItemOutcome::Skipped(reason) => write!(f, "skipped: {}", reason),
            ItemOutcome::Undecodable(detail) => write!(f, "undecodable: {}", detail),
        }
    }
}

/// Highest delivery index among finished posts, reduced as a monotonic maximum.
///
/// Removed posts are tracked apart and only used when no other post finished.
/// Undecodable children have no name and never count.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FurthestPosition {
    completed: Option<usize>,
    removed: Option<usize>,
}

impl FurthestPosition {
    pub fn record(&mut self, index: usize, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Skipped(reason) if reason.is_removal() => {
                self.removed = self.removed.max(Some(index));
            }
            ItemOutcome::Processed(_) | ItemOutcome::Skipped(_) => {
                self.completed = self.completed.max(Some(index));
            }
            ItemOutcome::Undecodable(_) => {}
        }
    }

    /// Delivery index the cursor should advance to.
    pub fn position(&self) -> Option<usize> {
        self.completed.or(self.removed)
    }
}

/// Summary of one processed page.
#[derive(Debug, Default, Clone)]
pub struct BatchReport {
    /// Children on the page.
    pub items_total: usize,
    /// Posts handed to a worker.
    pub items_dispatched: usize,
    pub saved: u64,
    pub already_present: u64,
    pub failed: u64,
    pub items_skipped: u64,
    /// Every recorded outcome, by delivery index.
    pub outcomes: Vec<(usize, ItemOutcome)>,
    /// Name of the post at the furthest processed position.
    pub next_cursor: Option<Cursor>,
    /// Launching stopped early because of a stop request.
    pub cancelled: bool,
}

impl BatchReport {
    pub fn new(items_total: usize) -> Self {
        Self {
            items_total,
            ..Default::default()
        }
    }

    pub fn record(&mut self, index: usize, outcome: ItemOutcome) {
        match &outcome {
            ItemOutcome::Processed(r) => {
                self.saved += r.saved;
                self.already_present += r.already_present;
                self.failed += r.failed;
            }
            ItemOutcome::Skipped(_) | ItemOutcome::Undecodable(_) => self.items_skipped += 1,
        }
        self.outcomes.push((index, outcome));
    }

    pub fn outcome(&self, index: usize) -> Option<&ItemOutcome> {
        self.outcomes
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, outcome)| outcome)
    }
}

/// Why the harvest loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopReason {
    /// A stop was requested.
    #[default]
    Cancelled,
    /// The API returned an empty page.
    EndOfResults,
    /// The configured page limit was reached.
    BatchLimit,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Cancelled => write!(f, "interrupted"),
            StopReason::EndOfResults => write!(f, "nothing more to fetch"),
            StopReason::BatchLimit => write!(f, "page limit reached"),
        }
    }
}

/// Totals for a whole run.
#[derive(Debug, Default, Clone)]
pub struct HarvestSummary {
    pub batches: u64,
    pub failed_fetches: u64,
    pub items_seen: u64,
    pub items_skipped: u64,
    pub saved: u64,
    pub already_present: u64,
    pub failed: u64,
    pub final_cursor: Cursor,
    pub stop_reason: StopReason,
}

impl HarvestSummary {
    /// Add statistics from a processed batch.
    pub fn add_batch(&mut self, report: &BatchReport) {
        self.batches += 1;
        self.items_seen += report.items_total as u64;
        self.items_skipped += report.items_skipped;
        self.saved += report.saved;
        self.already_present += report.already_present;
        self.failed += report.failed;
    }

    pub fn mark_fetch_failed(&mut self) {
        self.failed_fetches += 1;
    }
}
