//! API response type definitions.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Kind prefix the API puts in front of post ids.
const POST_KIND_PREFIX: &str = "t3_";

/// Top-level listing envelope.
#[derive(Debug, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

/// One page of a listing.
#[derive(Debug, Deserialize)]
pub struct ListingData {
    /// The API's own pagination token for the next page.
    #[serde(default)]
    pub after: Option<String>,

    /// Posts in delivery order. Kept raw so that one malformed post cannot
    /// fail the whole page.
    #[serde(default)]
    pub children: Vec<Thing>,
}

/// A typed wrapper around one listing child.
#[derive(Debug, Clone, Deserialize)]
pub struct Thing {
    #[serde(default)]
    pub kind: Option<String>,
    pub data: Value,
}

impl Thing {
    /// Decode the child as a post.
    pub fn post(&self) -> serde_json::Result<Post> {
        Post::deserialize(&self.data)
    }
}

/// A post from a subreddit listing.
///
/// Media-carrying fields are kept as raw JSON and decoded by the media
/// extractor, so a malformed gallery only affects its own post.
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    /// Fullname, e.g. `t3_abc123`. Used as the pagination cursor.
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Non-null when moderators or the author removed the post.
    #[serde(default)]
    pub removed_by_category: Option<String>,
    #[serde(default)]
    pub is_gallery: Option<bool>,
    /// Direct link to the single media item.
    #[serde(default)]
    pub url_overridden_by_dest: Option<String>,
    #[serde(default)]
    pub preview: Option<Value>,
    #[serde(default)]
    pub gallery_data: Option<Value>,
    #[serde(default)]
    pub media_metadata: Option<Value>,
}

impl Post {
    /// Post id without the kind prefix.
    pub fn id(&self) -> &str {
        self.name
            .strip_prefix(POST_KIND_PREFIX)
            .unwrap_or(&self.name)
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn is_removed(&self) -> bool {
        self.removed_by_category.is_some()
    }

    pub fn is_gallery(&self) -> bool {
        self.is_gallery.unwrap_or(false)
    }
}

/// Preview block of a single-media post.
#[derive(Debug, Clone, Deserialize)]
pub struct Preview {
    #[serde(default)]
    pub images: Vec<PreviewImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreviewImage {
    pub source: ImageSource,
}

/// Original-size image reference.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageSource {
    #[serde(default)]
    pub url: Option<String>,
    pub width: u32,
    pub height: u32,
}

/// Declared presentation order of a gallery.
#[derive(Debug, Clone, Deserialize)]
pub struct GalleryData {
    pub items: Vec<GalleryItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GalleryItem {
    pub media_id: String,
    #[serde(default)]
    pub id: Option<u64>,
}

/// Gallery media metadata, keyed by media id. Map order is meaningless.
pub type MediaMetadataMap = HashMap<String, MediaMetadata>;

/// Metadata for one gallery member.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaMetadata {
    #[serde(default)]
    pub status: Option<String>,
    /// Element type, e.g. `Image` or `AnimatedImage`.
    #[serde(default)]
    pub e: Option<String>,
    /// Source (largest) rendition.
    #[serde(default)]
    pub s: Option<MediaSource>,
}

impl MediaMetadata {
    pub fn is_valid(&self) -> bool {
        self.status.as_deref() == Some("valid")
    }
}

/// Source rendition of a gallery member.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaSource {
    /// Still image URL.
    #[serde(default)]
    pub u: Option<String>,
    /// Animated image URL.
    #[serde(default)]
    pub gif: Option<String>,
    #[serde(default)]
    pub x: Option<u32>,
    #[serde(default)]
    pub y: Option<u32>,
}

impl MediaSource {
    pub fn url(&self) -> Option<&str> {
        self.u.as_deref().or(self.gif.as_deref())
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        Some((self.x?, self.y?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_with_malformed_child() {
        let listing: Listing = serde_json::from_value(serde_json::json!({
            "kind": "Listing",
            "data": {
                "after": "t3_b",
                "children": [
                    { "kind": "t3", "data": { "name": "t3_a", "title": "A", "is_gallery": null } },
                    { "kind": "t3", "data": { "title": "no name" } }
                ]
            }
        }))
        .unwrap();

        assert_eq!(listing.data.after.as_deref(), Some("t3_b"));
        assert_eq!(listing.data.children.len(), 2);

        let post = listing.data.children[0].post().unwrap();
        assert_eq!(post.id(), "a");
        assert!(!post.is_gallery());
        assert!(!post.is_removed());

        assert!(listing.data.children[1].post().is_err());
    }

    #[test]
    fn test_media_source_falls_back_to_gif() {
        let source: MediaSource = serde_json::from_value(serde_json::json!({
            "gif": "https://i.redd.it/x.gif", "x": 10, "y": 20
        }))
        .unwrap();

        assert_eq!(source.url(), Some("https://i.redd.it/x.gif"));
        assert_eq!(source.dimensions(), Some((10, 20)));
    }
}
