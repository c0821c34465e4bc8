//! Reddit API HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tokio::io::AsyncWriteExt;

use crate::api::fetcher::{Fetcher, MediaSink};
use crate::config::Config;
use crate::error::{Error, Result};

/// Characters of a response body quoted in error messages.
const ERROR_SNIPPET_CHARS: usize = 200;

/// HTTP client for the public JSON listing API.
pub struct RedditApi {
    client: Client,
}

impl RedditApi {
    /// Create a new API client.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.options.user_agent,
            Duration::from_secs(config.options.request_timeout_secs),
        )
    }

    /// Make a GET request, mapping rate limiting to its own error.
    async fn get(&self, url: &str) -> Result<Response> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited);
        }

        Ok(response)
    }
}

#[async_trait]
impl Fetcher for RedditApi {
    async fn fetch_json(&self, url: &str) -> Result<Value> {
        let response = self.get(url).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api(format!(
                "HTTP {} for {}: {}",
                status,
                url,
                snippet(&body)
            )));
        }

        let text = response.text().await?;
        tracing::debug!("Listing response length: {} bytes", text.len());

        serde_json::from_str(&text).map_err(|e| {
            Error::MalformedPage(format!(
                "{} - Response: {}",
                e,
                snippet(&text)
            ))
        })
    }

    async fn fetch_media(&self, url: &str, sink: &mut MediaSink<'_>) -> Result<u64> {
        let response = self.get(url).await?;

        if !response.status().is_success() {
            return Err(Error::Download(format!(
                "Failed to download file: HTTP {}",
                response.status()
            )));
        }

        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
            sink.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
        }

        sink.flush().await?;
        Ok(downloaded)
    }
}

fn snippet(body: &str) -> String {
    body.chars().take(ERROR_SNIPPET_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_respects_char_boundaries() {
        let body = "é".repeat(300);
        assert_eq!(snippet(&body).chars().count(), ERROR_SNIPPET_CHARS);
    }

    #[test]
    fn test_client_builds() {
        assert!(RedditApi::from_config(&Config::default()).is_ok());
    }
}
