//! Path and directory management.

use std::path::{Path, PathBuf};

use crate::api::types::Post;
use crate::error::Result;
use crate::fs::naming::sanitize_title;

/// Folder all media of `post` is saved into.
pub fn post_directory(root: &Path, post: &Post) -> PathBuf {
    root.join(sanitize_title(post.title(), post.id()))
}

/// Ensure a directory exists, creating it if necessary.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}
