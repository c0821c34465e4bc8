//! Configuration validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};
use regex::Regex;

/// Maximum posts per page accepted by the API.
const MAX_PAGE_LIMIT: u32 = 100;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_subreddit(&config.target.subreddit)?;
    validate_query(config.target.query.as_deref())?;
    validate_filter(config.filter.resolution, config.filter.aspect_ratio)?;
    validate_options(config)?;

    Ok(())
}

/// Validate a subreddit name.
pub fn validate_subreddit(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::MissingConfig("subreddit".to_string()));
    }

    let clean = strip_subreddit_prefix(name);

    let pattern = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_]{1,20}$")
        .map_err(|e| Error::Config(format!("Invalid subreddit pattern: {}", e)))?;

    if !pattern.is_match(clean) {
        return Err(Error::ConfigValidation {
            field: "subreddit".to_string(),
            message: format!(
                "'{}' is not a valid subreddit name (2-21 characters, letters, digits and underscores)",
                name
            ),
        });
    }

    Ok(())
}

/// Drop the "r/" prefix people paste from the browser.
pub fn strip_subreddit_prefix(name: &str) -> &str {
    name.trim_start_matches('/').trim_start_matches("r/")
}

/// Validate the optional search query.
pub fn validate_query(query: Option<&str>) -> Result<()> {
    if let Some(query) = query {
        if query.trim().is_empty() {
            return Err(Error::ConfigValidation {
                field: "query".to_string(),
                message: "Search query cannot be empty".to_string(),
            });
        }
    }

    Ok(())
}

/// Validate the dimension filter settings.
pub fn validate_filter(resolution: Option<[u32; 2]>, aspect_ratio: Option<[u32; 2]>) -> Result<()> {
    if resolution.is_some() && aspect_ratio.is_some() {
        return Err(Error::ConfigValidation {
            field: "filter".to_string(),
            message: "resolution and aspect_ratio filters are mutually exclusive".to_string(),
        });
    }

    for (field, dims) in [("resolution", resolution), ("aspect_ratio", aspect_ratio)] {
        if let Some([width, height]) = dims {
            if width == 0 || height == 0 {
                return Err(Error::ConfigValidation {
                    field: field.to_string(),
                    message: format!("Dimensions must be positive (got {}x{})", width, height),
                });
            }
        }
    }

    Ok(())
}

fn validate_options(config: &Config) -> Result<()> {
    let options = &config.options;

    if options.page_limit == 0 || options.page_limit > MAX_PAGE_LIMIT {
        return Err(Error::ConfigValidation {
            field: "page_limit".to_string(),
            message: format!(
                "Must be between 1 and {} (got {})",
                MAX_PAGE_LIMIT, options.page_limit
            ),
        });
    }

    if options.max_concurrent_items == 0 {
        return Err(Error::ConfigValidation {
            field: "max_concurrent_items".to_string(),
            message: "Must be at least 1".to_string(),
        });
    }

    let [min_delay, max_delay] = options.page_delay_ms;
    if min_delay > max_delay {
        return Err(Error::ConfigValidation {
            field: "page_delay_ms".to_string(),
            message: format!("Minimum {} exceeds maximum {}", min_delay, max_delay),
        });
    }

    if options.user_agent.trim().is_empty() {
        return Err(Error::MissingConfig("user_agent".to_string()));
    }

    url::Url::parse(&options.base_url).map_err(|e| Error::ConfigValidation {
        field: "base_url".to_string(),
        message: e.to_string(),
    })?;

    Ok(())
}
