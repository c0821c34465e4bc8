//! Transport seam between the harvester and the network.

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncWrite;

use crate::error::Result;

/// Destination of a streamed media body.
pub type MediaSink<'a> = dyn AsyncWrite + Send + Unpin + 'a;

/// Fetches listing pages and media bodies.
///
/// Implemented by [`RedditApi`](crate::api::RedditApi) over HTTP; tests
/// substitute in-memory fakes. Timeouts are the implementation's concern.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch a listing page as JSON.
    async fn fetch_json(&self, url: &str) -> Result<Value>;

    /// Stream a media file into `sink` chunk by chunk, returning the byte count.
    ///
    /// On error `sink` may hold a partial body; the caller discards it.
    async fn fetch_media(&self, url: &str, sink: &mut MediaSink<'_>) -> Result<u64>;
}
