//! Concurrent processing of one listing page.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::api::{Fetcher, Post, Thing};
use crate::download::media::download_media;
use crate::download::state::{
    BatchReport, DownloadOutcome, FurthestPosition, ItemOutcome, ItemReport,
};
use crate::fs::{post_directory, Cursor};
use crate::media::{extract_media, MediaPolicy, SkipReason};

/// Shared, read-only inputs of every post worker.
#[derive(Clone)]
pub struct BatchContext {
    pub fetcher: Arc<dyn Fetcher>,
    pub policy: Arc<MediaPolicy>,
    /// Download root; each post gets its own folder below it.
    pub root: PathBuf,
    /// Upper bound on posts processed at the same time.
    pub max_concurrent_items: usize,
    /// Log every saved file at info level.
    pub show_downloads: bool,
}

/// Process every post of a page, at most `max_concurrent_items` at a time.
///
/// Posts are launched in delivery order. Once `cancel` fires no further post
/// is launched, but posts already running are awaited to completion. The
/// report's cursor names the post with the highest delivery index that
/// finished, falling back to the furthest removed post when nothing else
/// did. Completion order does not matter.
pub async fn process_batch(
    ctx: &BatchContext,
    children: &[Thing],
    cancel: &CancellationToken,
) -> BatchReport {
    let mut report = BatchReport::new(children.len());
    let mut names: Vec<Option<String>> = vec![None; children.len()];
    let mut furthest = FurthestPosition::default();

    let permits = Arc::new(Semaphore::new(ctx.max_concurrent_items.max(1)));
    let mut workers = JoinSet::new();

    for (index, child) in children.iter().enumerate() {
        let post = match child.post() {
            Ok(post) => post,
            Err(e) => {
                tracing::warn!("Skipping undecodable listing entry {}: {}", index, e);
                report.record(index, ItemOutcome::Undecodable(e.to_string()));
                continue;
            }
        };

        // Wait for a slot before checking for a stop, so a post queued behind
        // the limit is never started after cancellation.
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        if cancel.is_cancelled() {
            tracing::info!(
                "Stop requested, not starting the remaining {} posts of this page",
                children.len() - index
            );
            report.cancelled = true;
            break;
        }

        names[index] = Some(post.name.clone());

        if post.is_removed() {
            tracing::debug!("Skipping removed post {}", post.name);
            let outcome = ItemOutcome::Skipped(SkipReason::Removed);
            furthest.record(index, &outcome);
            report.record(index, outcome);
            continue;
        }

        let worker_ctx = ctx.clone();
        workers.spawn(async move {
            let _permit = permit;
            let outcome = process_post(&worker_ctx, &post).await;
            (index, outcome)
        });
        report.items_dispatched += 1;
    }

    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok((index, outcome)) => {
                tracing::debug!("Post {} done: {}", index, outcome);
                furthest.record(index, &outcome);
                report.record(index, outcome);
            }
            Err(e) => tracing::error!("Post worker failed: {}", e),
        }
    }

    report.outcomes.sort_by_key(|(index, _)| *index);
    report.next_cursor = furthest
        .position()
        .and_then(|index| names[index].clone())
        .map(Cursor::new);
    report
}

/// Extract a post's media and download every admitted candidate in order.
async fn process_post(ctx: &BatchContext, post: &Post) -> ItemOutcome {
    let candidates = match extract_media(post, &ctx.policy) {
        Ok(candidates) => candidates,
        Err(reason) => {
            tracing::debug!("Skipping {}: {}", post.name, reason);
            return ItemOutcome::Skipped(reason);
        }
    };

    let target_dir = post_directory(&ctx.root, post);
    let mut report = ItemReport::default();

    for candidate in candidates {
        let outcome = download_media(
            ctx.fetcher.as_ref(),
            &candidate.url,
            &target_dir,
            candidate.position,
        )
        .await;

        if ctx.show_downloads {
            if let DownloadOutcome::Saved(path) = &outcome {
                tracing::info!("Downloaded: {}", path.display());
            }
        }
        report.record(&outcome);
    }

    ItemOutcome::Processed(report)
}
