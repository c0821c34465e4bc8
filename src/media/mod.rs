//! Media module for filtering, candidate representation and extraction.

pub mod filter;
pub mod item;
pub mod parser;

pub use filter::{normalize_aspect_ratio, ContentFilter, MediaPolicy};
pub use item::{MediaCandidate, SkipReason};
pub use parser::extract_media;
