//! Filesystem module.
//!
//! Provides:
//! - Path and directory management
//! - Folder and filename generation
//! - The persisted pagination cursor

pub mod cursor;
pub mod naming;
pub mod paths;

/// Name of the cursor file inside the download root.
pub const CURSOR_FILE_NAME: &str = "after";

pub use cursor::{Cursor, CursorStore};
pub use naming::{media_filename, sanitize_filename, sanitize_title};
pub use paths::{ensure_dir, post_directory};
