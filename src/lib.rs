//! Reddit Harvester - a resumable subreddit media downloader
//!
//! This library pages through a subreddit listing (or a search inside one)
//! and saves every image it references into one folder per post.
//!
//! # Features
//!
//! - Single images and multi-image galleries, in gallery order
//! - Exact resolution or aspect ratio filtering
//! - Bounded concurrent processing of the posts on a page
//! - A persisted cursor, so an interrupted run resumes where it stopped
//! - Graceful stop: posts in progress finish, no new ones start
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use reddit_harvester::{Config, Harvester, RedditApi};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> reddit_harvester::Result<()> {
//!     let config = Config::default();
//!     let api = Arc::new(RedditApi::from_config(&config)?);
//!
//!     let summary = Harvester::new(&config, api, CancellationToken::new())?
//!         .run()
//!         .await?;
//!     println!("saved {} files", summary.saved);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod media;
pub mod output;
pub mod shutdown;

// Re-exports for convenience
pub use api::{Fetcher, RedditApi};
pub use config::{Config, ListingSort};
pub use download::{HarvestSummary, Harvester, StopReason};
pub use error::{Error, Result};
pub use media::{ContentFilter, MediaCandidate, MediaPolicy};
