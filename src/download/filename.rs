//! Archive filename derivation from download URLs.

use std::path::{Component, Path};

use tracing::debug;
use url::Url;

use super::error::DownloadError;
use crate::archive::ArchiveKind;

/// Derives the local archive filename from the last URL path segment.
///
/// The segment is percent-decoded and sanitized. If it does not carry the
/// extension of `kind` (for example a query-string download link), the
/// extension is appended so extraction dispatch stays consistent.
///
/// # Errors
///
/// Returns [`DownloadError::InvalidUrl`] if the URL cannot be parsed or has
/// no usable path segment.
pub fn archive_filename(url: &str, kind: ArchiveKind) -> Result<String, DownloadError> {
    let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;
    let last = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| DownloadError::invalid_url(url))?;

    let decoded = urlencoding::decode(last).unwrap_or_else(|e| {
        debug!(segment = %last, error = %e, "URL decoding failed, using raw segment");
        last.into()
    });
    let mut filename = sanitize_filename(&decoded);
    if !filename.ends_with(kind.extension()) {
        filename.push_str(kind.extension());
    }
    Ok(filename)
}

/// Sanitizes filename for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems:
/// / \ : * ? " < > |
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized
            .chars()
            .map(|c| if c == '.' { '_' } else { c })
            .collect()
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}
