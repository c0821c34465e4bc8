//! Reddit API module.
//!
//! This module provides:
//! - The `Fetcher` transport trait
//! - HTTP client for the public listing API
//! - Listing and search page URL construction
//! - API response types

pub mod client;
pub mod fetcher;
pub mod listing;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::RedditApi;
pub use fetcher::{Fetcher, MediaSink};
pub use listing::PageRequest;
pub use types::*;
