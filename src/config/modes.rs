//! Listing sort definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order in which the API pages through a subreddit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingSort {
    /// Front-page ordering (default).
    #[default]
    Hot,
    /// Newest posts first.
    New,
    /// Highest scoring posts first.
    Top,
    /// Posts gaining traction right now.
    Rising,
}

impl ListingSort {
    /// Path segment used by the listing endpoint.
    pub fn listing_path(&self) -> &'static str {
        match self {
            ListingSort::Hot => "hot",
            ListingSort::New => "new",
            ListingSort::Top => "top",
            ListingSort::Rising => "rising",
        }
    }

    /// Value of the `sort` parameter on the search endpoint.
    ///
    /// Search has no "hot" or "rising" ordering, so those fall back to relevance.
    pub fn search_param(&self) -> &'static str {
        match self {
            ListingSort::New => "new",
            ListingSort::Top => "top",
            ListingSort::Hot | ListingSort::Rising => "relevance",
        }
    }
}

impl fmt::Display for ListingSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.listing_path())
    }
}

impl FromStr for ListingSort {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hot" => Ok(ListingSort::Hot),
            "new" => Ok(ListingSort::New),
            "top" => Ok(ListingSort::Top),
            "rising" => Ok(ListingSort::Rising),
            _ => Err(format!("Unknown listing sort: {}", s)),
        }
    }
}
