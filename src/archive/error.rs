//! Error types for archive extraction.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while unpacking a source archive.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// File system error while reading the archive or writing entries.
    #[error("IO error at {path}: {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The tarball is not a readable gzip-compressed tar stream.
    #[error("failed to read tarball {archive}: {source}")]
    Tar {
        /// Archive path.
        archive: PathBuf,
        /// The underlying tar/gzip error.
        #[source]
        source: std::io::Error,
    },

    /// The zip archive is corrupt or uses an unsupported feature.
    #[error("failed to read zip archive {archive}: {source}")]
    Zip {
        /// Archive path.
        archive: PathBuf,
        /// The underlying zip error.
        #[source]
        source: zip::result::ZipError,
    },

    /// The directory named after the archive was not produced by extraction.
    #[error("extracting {archive} did not produce project directory {root}")]
    RootMissing {
        /// Archive path.
        archive: PathBuf,
        /// Expected project root.
        root: PathBuf,
    },

    /// The extracted project has no build script at its root.
    #[error("{script} for package {package} does not exist in {root}")]
    BuildScriptMissing {
        /// Package being installed.
        package: String,
        /// Build script filename.
        script: &'static str,
        /// Extracted project root.
        root: PathBuf,
    },

    /// Extraction stopped early because the run was interrupted.
    #[error("extraction of {archive} was cancelled")]
    Cancelled {
        /// Archive path.
        archive: PathBuf,
    },

    /// The blocking extraction task panicked or was cancelled.
    #[error("extraction task failed: {source}")]
    Task {
        /// The join error.
        #[source]
        source: tokio::task::JoinError,
    },
}

impl ExtractError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a tarball read error.
    pub fn tar(archive: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Tar {
            archive: archive.into(),
            source,
        }
    }

    /// Creates a zip read error.
    pub fn zip(archive: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        Self::Zip {
            archive: archive.into(),
            source,
        }
    }
}
