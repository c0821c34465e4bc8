//! Folder and filename generation.

use crate::error::{Error, Result};
use crate::fs::CURSOR_FILE_NAME;

/// Titles are cut to this many characters before sanitizing; long folder
/// names break on some file systems.
pub const MAX_TITLE_CHARS: usize = 25;

/// Folder name used when neither the title nor the post id leave anything usable.
const UNTITLED: &str = "untitled";

/// Derive a post's folder name from its title.
///
/// Takes the first [`MAX_TITLE_CHARS`] characters, keeps only alphabetic
/// characters and spaces, and collapses whitespace. Falls back to the
/// alphanumeric part of `fallback_id` when nothing usable is left. A name
/// that would shadow the cursor file in the download root is never used.
pub fn sanitize_title(title: &str, fallback_id: &str) -> String {
    let kept: String = title
        .chars()
        .take(MAX_TITLE_CHARS)
        .filter(|c| c.is_alphabetic() || c.is_whitespace())
        .collect();

    let collapsed = kept.split_whitespace().collect::<Vec<_>>().join(" ");
    if is_usable_folder(&collapsed) {
        return collapsed;
    }

    let fallback: String = fallback_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    if is_usable_folder(&fallback) {
        fallback
    } else {
        UNTITLED.to_string()
    }
}

/// Case-insensitive so the check also holds on case-folding file systems.
fn is_usable_folder(name: &str) -> bool {
    !name.is_empty() && !name.eq_ignore_ascii_case(CURSOR_FILE_NAME)
}

/// Filename for a media URL: the last path segment without its query
/// string, prefixed with a 1-based two-digit ordinal for gallery members.
///
/// Returns `None` when the URL has no usable final segment.
pub fn media_filename(url: &str, position: Option<usize>) -> Option<String> {
    let segment = last_path_segment(url)?;
    let name = sanitize_filename(&segment).ok()?;

    Some(match position {
        Some(index) => format!("{:02}_{}", index + 1, name),
        None => name,
    })
}

fn last_path_segment(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.last()?;
    if segment.is_empty() {
        return None;
    }
    Some(segment.to_string())
}

/// Validate and sanitize a filename by removing or replacing invalid characters.
///
/// Returns an error for names that would escape the target directory.
pub fn sanitize_filename(name: &str) -> Result<String> {
    if name == "." || name == ".." {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    if name.contains('/') || name.contains('\\') {
        return Err(Error::InvalidFilename(format!(
            "Path separators not allowed in filename: '{}'",
            name
        )));
    }

    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed in filename: '{}'",
            name
        )));
    }

    let sanitized: String = name
        .chars()
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Filename cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("Mountains at dusk", "abc"), "Mountains at dusk");
        assert_eq!(sanitize_title("Lake [3840x2160] (OC)", "abc"), "Lake x OC");
        assert_eq!(sanitize_title("a/b\\c", "abc"), "abc");
        assert_eq!(sanitize_title("../../etc/passwd", "abc"), "etcpasswd");
    }

    #[test]
    fn test_sanitize_title_truncates_before_filtering() {
        let title = "abcdefghijklmnopqrstuvwxy_this part is dropped";
        assert_eq!(sanitize_title(title, "id"), "abcdefghijklmnopqrstuvwxy");

        let title = "12345678901234567890 12345 Tail";
        assert_eq!(sanitize_title(title, "id1"), "id1");
    }

    #[test]
    fn test_sanitize_title_fallbacks() {
        assert_eq!(sanitize_title("2024", "1abcz"), "1abcz");
        assert_eq!(sanitize_title("", "../"), "untitled");
    }

    #[test]
    fn test_sanitize_title_avoids_cursor_file_name() {
        assert_eq!(sanitize_title("after", "q1w2"), "q1w2");
        assert_eq!(sanitize_title("After!", "q1w2"), "q1w2");
        assert_eq!(sanitize_title("  AFTER 2024 ", "q1w2"), "q1w2");
        assert_eq!(sanitize_title("after", "after"), "untitled");
        assert_eq!(sanitize_title("after hours", "q1w2"), "after hours");
    }

    #[test]
    fn test_media_filename() {
        assert_eq!(
            media_filename("https://i.redd.it/abc123.jpg", None).as_deref(),
            Some("abc123.jpg")
        );
        assert_eq!(
            media_filename("https://preview.redd.it/x.png?width=640&s=deadbeef", Some(0)).as_deref(),
            Some("01_x.png")
        );
        assert_eq!(
            media_filename("https://i.imgur.com/y.gif", Some(11)).as_deref(),
            Some("12_y.gif")
        );
        assert_eq!(media_filename("https://example.com", None), None);
        assert_eq!(media_filename("https://example.com/", None), None);
        assert_eq!(media_filename("https://example.com/a/..", None), None);
        assert_eq!(media_filename("not a url", None), None);
    }

    #[test]
    fn test_sanitize_filename_valid() {
        assert_eq!(sanitize_filename("normal.txt").unwrap(), "normal.txt");
        assert_eq!(sanitize_filename("file:name.txt").unwrap(), "file_name.txt");
    }

    #[test]
    fn test_sanitize_filename_rejects() {
        assert!(sanitize_filename("..").is_err());
        assert!(sanitize_filename("path/to/file.txt").is_err());
        assert!(sanitize_filename("file\0name.txt").is_err());
        assert!(sanitize_filename("   ").is_err());
    }
}
