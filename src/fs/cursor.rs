//! Persisted pagination cursor.

use std::fmt;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::{Error, Result};

/// Opaque resumption token: the fullname of the last post processed.
///
/// Empty means "start from the newest post".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(value: impl Into<String>) -> Self {
        Cursor(value.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "<newest>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Loads and saves the cursor file.
#[derive(Debug, Clone)]
pub struct CursorStore {
    path: PathBuf,
}

impl CursorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cursor. A missing file is an empty cursor.
    pub async fn load(&self) -> Result<Cursor> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Cursor::new(content.trim())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Cursor::default()),
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Overwrite the cursor file.
    ///
    /// Writes a sibling temp file and renames it over the target, so an
    /// interrupted save leaves the previous cursor intact.
    pub async fn save(&self, cursor: &Cursor) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, cursor.as_str()).await?;
        if let Err(e) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(Error::Io(e));
        }

        tracing::debug!("Saved cursor {} to {}", cursor, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_missing_file_is_empty_cursor() {
        let dir = tempfile::tempdir().unwrap();
        let store = CursorStore::new(dir.path().join("after"));

        let cursor = assert_ok!(store.load().await);
        assert!(cursor.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = CursorStore::new(dir.path().join("after"));

        assert_ok!(store.save(&Cursor::new("t3_first")).await);
        assert_ok!(store.save(&Cursor::new("t3_second")).await);

        assert_eq!(store.load().await.unwrap(), Cursor::new("t3_second"));
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, "t3_second");
        assert!(!dir.path().join("after.tmp").exists());
    }

    #[tokio::test]
    async fn test_load_trims_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("after");
        std::fs::write(&path, "t3_abc\n").unwrap();

        let cursor = CursorStore::new(&path).load().await.unwrap();
        assert_eq!(cursor.as_str(), "t3_abc");
    }

    #[tokio::test]
    async fn test_unreadable_cursor_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be
        let store = CursorStore::new(dir.path());

        assert!(store.load().await.is_err());
    }
}
