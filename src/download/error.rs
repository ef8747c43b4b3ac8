//! Error types for the download module.
//!
//! Covers both index page fetches and archive downloads. Every variant except
//! [`DownloadError::Incomplete`] and [`DownloadError::Io`] belongs to the
//! network failure category.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching pages or downloading archives.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout requesting {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} requesting {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// File system error during download (create file, write, etc.)
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Bytes written do not match the declared `Content-Length`.
    #[error("incomplete download of {url}: expected {expected_bytes} bytes, got {actual_bytes}")]
    Incomplete {
        /// The URL that was downloaded.
        url: String,
        /// Declared content length.
        expected_bytes: u64,
        /// Bytes actually written.
        actual_bytes: u64,
    },
}

impl DownloadError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an incomplete-download error.
    pub fn incomplete(url: impl Into<String>, expected_bytes: u64, actual_bytes: u64) -> Self {
        Self::Incomplete {
            url: url.into(),
            expected_bytes,
            actual_bytes,
        }
    }

    /// Returns true if the response body stream broke off while reading.
    #[must_use]
    pub fn is_truncated_body(&self) -> bool {
        matches!(self, Self::Network { source, .. } if source.is_body() || source.is_decode())
    }

    /// Returns true if this error belongs to the network category.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Network { .. }
                | Self::Timeout { .. }
                | Self::HttpStatus { .. }
                | Self::InvalidUrl { .. }
        )
    }
}

// No `From<reqwest::Error>` or `From<std::io::Error>`: every variant needs a
// URL or path the source error does not carry.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_error_timeout_display() {
        let error = DownloadError::timeout("https://example.com/pkg.tar.gz");
        assert!(error.to_string().contains("timeout"));
        assert!(error.to_string().contains("https://example.com/pkg.tar.gz"));
        assert!(error.is_network());
    }

    #[test]
    fn test_download_error_http_status_display() {
        let error = DownloadError::http_status("https://pypi.org/project/nope/#files", 404);
        let msg = error.to_string();
        assert!(msg.contains("404"), "Expected '404' in: {msg}");
        assert!(msg.contains("pypi.org/project/nope"), "Expected URL in: {msg}");
        assert!(error.is_network());
    }

    #[test]
    fn test_download_error_incomplete_display() {
        let error = DownloadError::incomplete("https://example.com/a.zip", 100, 99);
        let msg = error.to_string();
        assert!(msg.contains("expected 100 bytes, got 99"), "got: {msg}");
        assert!(!error.is_network());
    }

    #[test]
    fn test_download_error_io_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error = DownloadError::io(PathBuf::from("/tmp/pkg.tar.gz"), io_error);
        assert!(error.to_string().contains("/tmp/pkg.tar.gz"));
        assert!(!error.is_network());
    }

    #[test]
    fn test_download_error_invalid_url_display() {
        let error = DownloadError::invalid_url("not-a-url");
        let msg = error.to_string();
        assert!(msg.contains("invalid URL"), "Expected 'invalid URL' in: {msg}");
        assert!(msg.contains("not-a-url"));
    }
}
