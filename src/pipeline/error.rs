//! Per-package failure taxonomy.

use std::fmt;

use thiserror::Error;

use crate::archive::{ExtractError, TAR_EXTENSION, ZIP_EXTENSION};
use crate::download::DownloadError;
use crate::install::InstallError;

/// Errors that end the pipeline for one package.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The index page could not be fetched.
    #[error("failed to fetch index page for {package}: {source}")]
    IndexFetch {
        /// Package being installed.
        package: String,
        /// The underlying request error.
        #[source]
        source: DownloadError,
    },

    /// The index page lists no recognised source archive.
    #[error(
        "{} or {} source file for {package} could not be found from {url}",
        TAR_EXTENSION,
        ZIP_EXTENSION
    )]
    ArchiveNotFound {
        /// Package being installed.
        package: String,
        /// Index page that was scanned.
        url: String,
    },

    /// The archive download failed or was incomplete.
    #[error("failed to download {package}: {source}")]
    Download {
        /// Package being installed.
        package: String,
        /// The underlying download error.
        #[source]
        source: DownloadError,
    },

    /// The archive could not be extracted or lacks a build script.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// A dependency or build command failed.
    #[error("failed to install {package}: {source}")]
    Install {
        /// Package being installed.
        package: String,
        /// The underlying install error.
        #[source]
        source: InstallError,
    },
}

/// Failure categories reported in the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FailureKind {
    /// Request failed or non-success status.
    Network,
    /// No recognised archive link on the index page.
    ArchiveNotFound,
    /// Bytes written did not match `Content-Length`.
    DownloadIncomplete,
    /// Archive unreadable or project root missing.
    Extraction,
    /// No build script at the extracted root.
    BuildScriptMissing,
    /// Child process failed to start or exited non-zero.
    BuildFailed,
    /// Local file system error.
    Filesystem,
}

impl FailureKind {
    /// Returns the human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Network => "Network",
            Self::ArchiveNotFound => "No source archive",
            Self::DownloadIncomplete => "Incomplete download",
            Self::Extraction => "Extraction",
            Self::BuildScriptMissing => "Missing build script",
            Self::BuildFailed => "Build failed",
            Self::Filesystem => "Filesystem",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl PipelineError {
    /// Classifies this error for reporting.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::IndexFetch { .. } => FailureKind::Network,
            Self::ArchiveNotFound { .. } => FailureKind::ArchiveNotFound,
            Self::Download { source, .. } => match source {
                DownloadError::Incomplete { .. } => FailureKind::DownloadIncomplete,
                DownloadError::Io { .. } => FailureKind::Filesystem,
                _ => FailureKind::Network,
            },
            Self::Extract(ExtractError::BuildScriptMissing { .. }) => {
                FailureKind::BuildScriptMissing
            }
            Self::Extract(ExtractError::Io { .. }) => FailureKind::Filesystem,
            Self::Extract(_) => FailureKind::Extraction,
            Self::Install { .. } => FailureKind::BuildFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_archive_not_found_message_names_extensions_and_url() {
        let error = PipelineError::ArchiveNotFound {
            package: "nosdist".to_string(),
            url: "https://pypi.org/project/nosdist/#files".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains(".tar.gz or .zip"), "got: {msg}");
        assert!(msg.contains("https://pypi.org/project/nosdist/#files"));
        assert_eq!(error.kind(), FailureKind::ArchiveNotFound);
    }

    #[test]
    fn test_download_kinds() {
        let incomplete = PipelineError::Download {
            package: "p".to_string(),
            source: DownloadError::incomplete("u", 2, 1),
        };
        assert_eq!(incomplete.kind(), FailureKind::DownloadIncomplete);

        let status = PipelineError::Download {
            package: "p".to_string(),
            source: DownloadError::http_status("u", 503),
        };
        assert_eq!(status.kind(), FailureKind::Network);

        let fetch = PipelineError::IndexFetch {
            package: "p".to_string(),
            source: DownloadError::timeout("u"),
        };
        assert_eq!(fetch.kind(), FailureKind::Network);
    }

    #[test]
    fn test_extract_kinds() {
        let missing = PipelineError::from(ExtractError::BuildScriptMissing {
            package: "p".to_string(),
            script: "setup.py",
            root: PathBuf::from("/x"),
        });
        assert_eq!(missing.kind(), FailureKind::BuildScriptMissing);
        assert!(missing.to_string().contains("setup.py for package p"));

        let root = PipelineError::from(ExtractError::RootMissing {
            archive: PathBuf::from("/x.zip"),
            root: PathBuf::from("/x"),
        });
        assert_eq!(root.kind(), FailureKind::Extraction);
    }

    #[test]
    fn test_install_kind() {
        let error = PipelineError::Install {
            package: "p".to_string(),
            source: InstallError::BuildFailed {
                command: "python3 setup.py install --user".to_string(),
                code: Some(1),
            },
        };
        assert_eq!(error.kind(), FailureKind::BuildFailed);
        assert!(error.to_string().contains("exit code 1"));
    }
}
