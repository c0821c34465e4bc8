//! Listing and search page URLs.

use url::Url;

use crate::config::{strip_subreddit_prefix, Config, ListingSort};
use crate::error::Result;
use crate::fs::Cursor;

/// Everything needed to address one page of posts, apart from the cursor.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub base_url: String,
    pub subreddit: String,
    pub query: Option<String>,
    pub sort: ListingSort,
    pub limit: u32,
}

impl PageRequest {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.options.base_url.clone(),
            subreddit: strip_subreddit_prefix(&config.target.subreddit).to_string(),
            query: config.target.query.clone(),
            sort: config.target.sort,
            limit: config.options.page_limit,
        }
    }

    /// Build the page URL. The `after` anchor is only added for a non-empty cursor.
    pub fn url(&self, cursor: &Cursor) -> Result<Url> {
        let base = Url::parse(&self.base_url)?;

        let mut url = match &self.query {
            Some(_) => base.join(&format!("r/{}/search.json", self.subreddit))?,
            None => base.join(&format!("r/{}/{}.json", self.subreddit, self.sort.listing_path()))?,
        };

        {
            let mut pairs = url.query_pairs_mut();
            if let Some(query) = &self.query {
                pairs
                    .append_pair("q", query)
                    .append_pair("restrict_sr", "1")
                    .append_pair("sort", self.sort.search_param());
            }
            pairs
                .append_pair("limit", &self.limit.to_string())
                .append_pair("raw_json", "1");
            if !cursor.is_empty() {
                pairs.append_pair("after", cursor.as_str());
            }
        }

        Ok(url)
    }

    /// Whether pages come from the search endpoint.
    pub fn is_search(&self) -> bool {
        self.query.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(query: Option<&str>) -> PageRequest {
        PageRequest {
            base_url: "https://www.reddit.com".to_string(),
            subreddit: "wallpapers".to_string(),
            query: query.map(str::to_string),
            sort: ListingSort::Hot,
            limit: 100,
        }
    }

    #[test]
    fn test_listing_url_without_cursor() {
        let url = request(None).url(&Cursor::default()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.reddit.com/r/wallpapers/hot.json?limit=100&raw_json=1"
        );
    }

    #[test]
    fn test_listing_url_with_cursor() {
        let url = request(None).url(&Cursor::new("t3_abc")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.reddit.com/r/wallpapers/hot.json?limit=100&raw_json=1&after=t3_abc"
        );
    }

    #[test]
    fn test_search_url() {
        let url = request(Some("blue lake")).url(&Cursor::new("t3_x")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.reddit.com/r/wallpapers/search.json?q=blue+lake&restrict_sr=1&sort=relevance&limit=100&raw_json=1&after=t3_x"
        );
        assert!(request(Some("q")).is_search());
    }

    #[test]
    fn test_from_config_strips_prefix() {
        let mut config = Config::default();
        config.target.subreddit = "r/EarthPorn".to_string();
        config.target.sort = ListingSort::New;

        let url = PageRequest::from_config(&config)
            .url(&Cursor::default())
            .unwrap();
        assert_eq!(url.path(), "/r/EarthPorn/new.json");
    }
}
