//! In-memory [`Fetcher`] and listing builders for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::AsyncWriteExt;

use crate::api::{Fetcher, MediaSink};
use crate::error::{Error, Result};

type MediaHook = Box<dyn Fn(&str) + Send + Sync>;

enum PageResponse {
    Page(Value),
    Failure,
}

/// Serves queued listing pages in order, then empty pages. Media URLs not
/// registered with [`FakeFetcher::with_media`] fail.
#[derive(Default)]
pub struct FakeFetcher {
    pages: Mutex<VecDeque<PageResponse>>,
    media: HashMap<String, Vec<u8>>,
    delays: HashMap<String, Duration>,
    on_media: Option<MediaHook>,
    page_requests: Mutex<Vec<String>>,
    media_requests: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, page: Value) -> Self {
        self.push(PageResponse::Page(page));
        self
    }

    pub fn with_failed_page(self) -> Self {
        self.push(PageResponse::Failure);
        self
    }

    pub fn with_media(mut self, url: &str, bytes: &[u8]) -> Self {
        self.media.insert(url.to_string(), bytes.to_vec());
        self
    }

    /// Hold the response for `url` back by `delay`.
    pub fn with_delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    /// Run `hook` on every media request, before answering it.
    pub fn on_media(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_media = Some(Box::new(hook));
        self
    }

    pub fn page_requests(&self) -> Vec<String> {
        self.page_requests.lock().unwrap().clone()
    }

    pub fn media_requests(&self) -> Vec<String> {
        self.media_requests.lock().unwrap().clone()
    }

    fn push(&self, response: PageResponse) {
        self.pages.lock().unwrap().push_back(response);
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value> {
        self.page_requests.lock().unwrap().push(url.to_string());
        let next = self.pages.lock().unwrap().pop_front();
        match next {
            Some(PageResponse::Page(page)) => Ok(page),
            Some(PageResponse::Failure) => Err(Error::Api("HTTP 503 Service Unavailable".into())),
            None => Ok(listing(Vec::new())),
        }
    }

    async fn fetch_media(&self, url: &str, sink: &mut MediaSink<'_>) -> Result<u64> {
        self.media_requests.lock().unwrap().push(url.to_string());
        if let Some(hook) = &self.on_media {
            hook(url);
        }
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        let body = self
            .media
            .get(url)
            .ok_or_else(|| Error::Download("Failed to download file: HTTP 404 Not Found".into()))?;
        sink.write_all(body).await?;
        Ok(body.len() as u64)
    }
}

/// A listing page holding `children`.
pub fn listing(children: Vec<Value>) -> Value {
    let after = children
        .last()
        .and_then(|child| child["data"]["name"].as_str())
        .map(str::to_string);
    json!({ "kind": "Listing", "data": { "after": after, "children": children } })
}

/// A single-image post with preview dimensions.
pub fn image_post(name: &str, title: &str, url: &str, width: u32, height: u32) -> Value {
    json!({ "kind": "t3", "data": {
        "name": name,
        "title": title,
        "url_overridden_by_dest": url,
        "preview": { "images": [ { "source": { "url": url, "width": width, "height": height } } ] }
    }})
}

/// A gallery post whose members are `(media_id, url)` pairs, all valid 1920x1080.
pub fn gallery_post(name: &str, title: &str, members: &[(&str, &str)]) -> Value {
    let items: Vec<Value> = members
        .iter()
        .enumerate()
        .map(|(i, (media_id, _))| json!({ "media_id": media_id, "id": i }))
        .collect();
    let metadata: serde_json::Map<String, Value> = members
        .iter()
        .map(|(media_id, url)| {
            (
                media_id.to_string(),
                json!({ "status": "valid", "e": "Image", "s": { "u": url, "x": 1920, "y": 1080 } }),
            )
        })
        .collect();

    json!({ "kind": "t3", "data": {
        "name": name,
        "title": title,
        "is_gallery": true,
        "gallery_data": { "items": items },
        "media_metadata": metadata
    }})
}

/// A post carrying a removal marker.
pub fn removed_post(name: &str) -> Value {
    json!({ "kind": "t3", "data": {
        "name": name,
        "title": "[removed]",
        "removed_by_category": "moderator",
        "url_overridden_by_dest": "https://i.redd.it/gone.jpg"
    }})
}
