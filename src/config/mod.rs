//! Configuration module for the reddit-harvester.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Listing sort modes
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{Config, FilterConfig, OptionsConfig, TargetConfig};
pub use modes::ListingSort;
pub use validation::{strip_subreddit_prefix, validate_config};
