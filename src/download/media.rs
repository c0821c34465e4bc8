//! Media file downloading.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::api::Fetcher;
use crate::download::state::DownloadOutcome;
use crate::error::Result;
use crate::fs::{ensure_dir, media_filename};

/// Download one media URL into `target_dir`.
///
/// The filename is the URL's last path segment, prefixed with the 1-based
/// ordinal for gallery members. An existing file is left untouched and not
/// fetched again. Failures are logged and returned as
/// [`DownloadOutcome::Failed`]; they never abort the caller.
pub async fn download_media(
    fetcher: &dyn Fetcher,
    url: &str,
    target_dir: &Path,
    position: Option<usize>,
) -> DownloadOutcome {
    let Some(filename) = media_filename(url, position) else {
        return failed(url, "URL has no usable file name".to_string());
    };
    let output_path = target_dir.join(&filename);

    match fs::try_exists(&output_path).await {
        Ok(true) => return already_present(output_path),
        Ok(false) => {}
        Err(e) => return failed(url, format!("cannot stat {}: {}", output_path.display(), e)),
    }

    if let Err(e) = ensure_dir(target_dir).await {
        return failed(url, e.to_string());
    }

    let part_path = target_dir.join(format!(".{}.part", Uuid::new_v4()));
    let placed = match stream_to_part(fetcher, url, &part_path).await {
        Ok(()) => place_file(&part_path, &output_path).await,
        Err(e) => Err(e),
    };
    let _ = fs::remove_file(&part_path).await;

    match placed {
        Ok(true) => DownloadOutcome::Saved(output_path),
        Ok(false) => already_present(output_path),
        Err(e) => failed(url, e.to_string()),
    }
}

/// Stream the body into a hidden part file next to the target.
async fn stream_to_part(fetcher: &dyn Fetcher, url: &str, part_path: &Path) -> Result<()> {
    let mut file = File::create(part_path).await?;
    let written = fetcher.fetch_media(url, &mut file).await?;
    file.flush().await?;
    tracing::debug!("Fetched {} bytes from {}", written, url);
    Ok(())
}

/// Link the finished part file to its final name.
///
/// Returns `false` when another worker created the target first; an existing
/// target is never replaced.
async fn place_file(part_path: &Path, output_path: &Path) -> Result<bool> {
    match fs::hard_link(part_path, output_path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => {
            // File systems without hard links
            tracing::debug!("Hard link failed ({}), renaming instead", e);
            if fs::try_exists(output_path).await? {
                return Ok(false);
            }
            fs::rename(part_path, output_path).await?;
            Ok(true)
        }
    }
}

fn already_present(output_path: PathBuf) -> DownloadOutcome {
    tracing::debug!("Skipping existing file: {}", output_path.display());
    DownloadOutcome::AlreadyPresent(output_path)
}

fn failed(url: &str, reason: String) -> DownloadOutcome {
    tracing::warn!("Failed to download {}: {}", url, reason);
    DownloadOutcome::Failed {
        url: url.to_string(),
        reason,
    }
}
