//! Manifest (requirements file) parsing.
//!
//! A manifest lists one package per line. Pinned versions such as
//! `requests==2.20.1` are accepted and the version part is dropped: only the
//! text before the first `=` is kept.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Errors that can occur while reading a manifest file.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("failed to read manifest {path}: {source}")]
    Read {
        /// Manifest path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Parses manifest text into an ordered list of package names.
///
/// Each line is trimmed and truncated at the first `=`. Blank lines and
/// `#` comment lines are dropped; duplicates are kept in order.
#[must_use]
pub fn parse_manifest(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.starts_with('#') {
                return None;
            }
            let name = line.split('=').next().unwrap_or_default().trim();
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}

/// Reads and parses a manifest file.
///
/// # Errors
///
/// Returns [`ManifestError::Read`] if the file cannot be read as UTF-8 text.
pub fn read_manifest(path: &Path) -> Result<Vec<String>, ManifestError> {
    let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let packages = parse_manifest(&text);
    debug!(path = %path.display(), count = packages.len(), "manifest parsed");
    Ok(packages)
}
