//! Media dimension filtering.

use crate::config::FilterConfig;
use crate::config::validation::validate_filter;
use crate::error::Result;
use crate::media::item::MediaCandidate;

/// Reduce a `(width, height)` pair to lowest terms.
///
/// Both values must be non-zero; callers guard against that.
pub fn normalize_aspect_ratio(width: u32, height: u32) -> (u32, u32) {
    let divisor = gcd(width, height);
    (width / divisor, height / divisor)
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Predicate over a media item's dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentFilter {
    /// Accept everything.
    #[default]
    None,
    /// Accept only this exact resolution.
    Resolution { width: u32, height: u32 },
    /// Accept any resolution with this ratio. Stored in lowest terms.
    AspectRatio { width: u32, height: u32 },
}

impl ContentFilter {
    pub fn resolution(width: u32, height: u32) -> Self {
        ContentFilter::Resolution { width, height }
    }

    /// Build an aspect-ratio filter, normalizing the given pair.
    pub fn aspect_ratio(width: u32, height: u32) -> Self {
        let (width, height) = normalize_aspect_ratio(width, height);
        ContentFilter::AspectRatio { width, height }
    }

    /// Build the filter from the `[filter]` configuration section.
    pub fn from_config(config: &FilterConfig) -> Result<Self> {
        validate_filter(config.resolution, config.aspect_ratio)?;

        Ok(match (config.resolution, config.aspect_ratio) {
            (Some([w, h]), _) => ContentFilter::resolution(w, h),
            (_, Some([w, h])) => ContentFilter::aspect_ratio(w, h),
            (None, None) => ContentFilter::None,
        })
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ContentFilter::None)
    }

    /// Check whether media of the given size passes the filter.
    pub fn matches(&self, width: u32, height: u32) -> bool {
        match *self {
            ContentFilter::None => true,
            ContentFilter::Resolution {
                width: w,
                height: h,
            } => width == w && height == h,
            ContentFilter::AspectRatio {
                width: w,
                height: h,
            } => width != 0 && height != 0 && normalize_aspect_ratio(width, height) == (w, h),
        }
    }

    /// Like [`matches`](Self::matches), for media whose size may be unknown.
    /// Unknown sizes only pass when there is no filter.
    pub fn matches_dimensions(&self, dimensions: Option<(u32, u32)>) -> bool {
        match dimensions {
            Some((width, height)) => self.matches(width, height),
            None => self.is_none(),
        }
    }
}

impl std::fmt::Display for ContentFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentFilter::None => write!(f, "none"),
            ContentFilter::Resolution { width, height } => write!(f, "{}x{}", width, height),
            ContentFilter::AspectRatio { width, height } => write!(f, "{}:{}", width, height),
        }
    }
}

/// Host fragment of the provider suppressed unless explicitly allowed.
const REDGIFS_HOST: &str = "redgif";

/// Everything that decides whether an extracted media URL gets downloaded.
///
/// Built once per run and shared read-only by all batch workers.
#[derive(Debug, Clone, Default)]
pub struct MediaPolicy {
    pub filter: ContentFilter,
    pub allow_redgifs: bool,
}

impl MediaPolicy {
    pub fn new(filter: ContentFilter, allow_redgifs: bool) -> Self {
        Self {
            filter,
            allow_redgifs,
        }
    }

    /// Check a candidate against the dimension filter and provider suppression.
    pub fn admits(&self, candidate: &MediaCandidate) -> bool {
        if !self.allow_redgifs && is_redgifs_url(&candidate.url) {
            return false;
        }
        self.filter.matches_dimensions(candidate.dimensions)
    }
}

/// Whether a URL points at redgifs.
pub fn is_redgifs_url(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => parsed
            .host_str()
            .map(|host| host.to_ascii_lowercase().contains(REDGIFS_HOST))
            .unwrap_or(false),
        Err(_) => url.to_ascii_lowercase().contains(REDGIFS_HOST),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_aspect_ratio(1920, 1080), (16, 9));
        assert_eq!(normalize_aspect_ratio(3840, 2160), (16, 9));
        assert_eq!(normalize_aspect_ratio(1080, 1920), (9, 16));
        assert_eq!(normalize_aspect_ratio(7, 3), (7, 3));
    }

    #[test]
    fn test_normalize_idempotent() {
        for (w, h) in [(1920, 1080), (2560, 1080), (1000, 1000), (1366, 768)] {
            let once = normalize_aspect_ratio(w, h);
            assert_eq!(normalize_aspect_ratio(once.0, once.1), once);
        }
    }

    #[test]
    fn test_resolution_filter() {
        let filter = ContentFilter::resolution(1920, 1080);
        assert!(filter.matches(1920, 1080));
        assert!(!filter.matches(1920, 1081));
        assert!(!filter.matches(3840, 2160));
    }

    #[test]
    fn test_aspect_ratio_filter() {
        let filter = ContentFilter::aspect_ratio(1920, 1080);
        assert_eq!(filter, ContentFilter::AspectRatio { width: 16, height: 9 });
        assert!(filter.matches(1920, 1080));
        assert!(filter.matches(3840, 2160));
        assert!(!filter.matches(1920, 1081));
        assert!(!filter.matches(0, 1080));
    }

    #[test]
    fn test_no_filter() {
        assert!(ContentFilter::None.matches(1, 1));
        assert!(ContentFilter::None.matches_dimensions(None));
        assert!(!ContentFilter::resolution(1, 1).matches_dimensions(None));
    }

    #[test]
    fn test_from_config() {
        let config = FilterConfig {
            resolution: None,
            aspect_ratio: Some([32, 18]),
        };
        assert_eq!(
            ContentFilter::from_config(&config).unwrap(),
            ContentFilter::AspectRatio { width: 16, height: 9 }
        );

        let config = FilterConfig {
            resolution: Some([1920, 1080]),
            aspect_ratio: Some([16, 9]),
        };
        assert!(ContentFilter::from_config(&config).is_err());

        assert!(ContentFilter::from_config(&FilterConfig::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_redgifs_detection() {
        assert!(is_redgifs_url("https://www.redgifs.com/watch/abc"));
        assert!(is_redgifs_url("https://i.REDGIFS.com/abc.mp4"));
        assert!(is_redgifs_url("not a url redgifs"));
        assert!(!is_redgifs_url("https://i.redd.it/redgifs.jpg"));
    }

    #[test]
    fn test_policy_suppresses_redgifs_regardless_of_filter() {
        let candidate = MediaCandidate::single("https://redgifs.com/watch/x", Some((1920, 1080)));

        assert!(!MediaPolicy::new(ContentFilter::None, false).admits(&candidate));
        assert!(MediaPolicy::new(ContentFilter::None, true).admits(&candidate));
        assert!(!MediaPolicy::new(ContentFilter::resolution(1, 1), true).admits(&candidate));
    }
}
