//! Media candidate representation.

use std::fmt;

/// A downloadable media reference extracted from a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaCandidate {
    /// Zero-based position within a gallery. `None` for single-media posts.
    pub position: Option<usize>,

    /// Download URL.
    pub url: String,

    /// `(width, height)` when the API reported it.
    pub dimensions: Option<(u32, u32)>,
}

impl MediaCandidate {
    /// A single-media post's only candidate.
    pub fn single(url: impl Into<String>, dimensions: Option<(u32, u32)>) -> Self {
        Self {
            position: None,
            url: url.into(),
            dimensions,
        }
    }

    /// A gallery member at `position`.
    pub fn gallery_member(
        position: usize,
        url: impl Into<String>,
        dimensions: Option<(u32, u32)>,
    ) -> Self {
        Self {
            position: Some(position),
            url: url.into(),
            dimensions,
        }
    }
}

/// Why a post produced no downloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The post carries a removal marker.
    Removed,
    /// Gallery structure missing or unreadable.
    MalformedGallery(String),
    /// Neither a media link nor a gallery.
    NoMedia,
}

impl SkipReason {
    /// Removed posts only govern the cursor when nothing else in the batch completed.
    pub fn is_removal(&self) -> bool {
        matches!(self, SkipReason::Removed)
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Removed => write!(f, "post was removed"),
            SkipReason::MalformedGallery(detail) => write!(f, "malformed gallery: {}", detail),
            SkipReason::NoMedia => write!(f, "post has no media"),
        }
    }
}
