//! HTTP client wrapper for index pages and archive downloads.
//!
//! This module provides the `HttpClient` struct which fetches index pages as
//! text and streams archives to disk with a `Content-Length` integrity check.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::{Stream, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use reqwest::header::CONTENT_LENGTH;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};
use url::Url;

use super::constants::{CHUNK_SIZE, CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use crate::user_agent;

/// HTTP client shared by every stage of a run.
///
/// Created once and reused for all packages, taking advantage of connection
/// pooling.
///
/// # Example
///
/// ```no_run
/// use download_tarball::download::HttpClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let html = client.fetch_page("https://pypi.org/project/tqdm/#files").await?;
/// println!("{} bytes of HTML", html.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    show_progress: bool,
}

/// Result of a completed archive download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// Where the archive was written.
    pub path: PathBuf,
    /// Bytes written to disk.
    pub bytes_written: u64,
    /// Declared `Content-Length`, when present and nonzero.
    pub content_length: Option<u64>,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::new_with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a new HTTP client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self {
            client,
            show_progress: false,
        }
    }

    /// Enables or disables the terminal progress bar for downloads.
    #[must_use]
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Fetches a page and returns its body as text.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if the request fails or the server answers
    /// with a non-success status.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_page(&self, url: &str) -> Result<String, DownloadError> {
        let response = self.send(url).await?;
        let body = response.text().await.map_err(|e| map_request_error(url, e))?;
        debug!(bytes = body.len(), "page fetched");
        Ok(body)
    }

    /// Streams `url` into the file at `dest`.
    ///
    /// The body is written in 1024-byte chunks. When the response declares a
    /// nonzero `Content-Length`, the number of bytes written must match it.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if the request fails, writing fails, or the
    /// byte count does not match (`Incomplete`). The partial file is removed
    /// on error.
    #[instrument(skip(self, dest), fields(url = %url, dest = %dest.display()))]
    pub async fn download_to_path(
        &self,
        url: &str,
        dest: &Path,
    ) -> Result<DownloadOutcome, DownloadError> {
        let response = self.send(url).await?;
        let content_length = declared_content_length(&response);
        let progress = self.progress_bar(content_length);

        let result = write_stream(
            response
                .bytes_stream()
                .map(|chunk| chunk.map_err(|e| map_request_error(url, e))),
            dest,
            url,
            content_length,
            &progress,
        )
        .await;
        progress.finish_and_clear();

        let bytes_written = result?;
        info!(bytes = bytes_written, "download complete");
        Ok(DownloadOutcome {
            path: dest.to_path_buf(),
            bytes_written,
            content_length,
        })
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| map_request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }
        Ok(response)
    }

    fn progress_bar(&self, content_length: Option<u64>) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        match content_length {
            Some(total) => {
                let bar = ProgressBar::new(total);
                bar.set_style(
                    ProgressStyle::with_template(
                        "{bar:40.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec})",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
                );
                bar
            }
            None => {
                let spinner = ProgressBar::new_spinner();
                spinner.set_style(
                    ProgressStyle::with_template("{spinner} {bytes} downloaded")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                spinner
            }
        }
    }
}

fn map_request_error(url: &str, error: reqwest::Error) -> DownloadError {
    if error.is_timeout() {
        DownloadError::timeout(url)
    } else {
        DownloadError::network(url, error)
    }
}

/// Reads `Content-Length`; absent, unparsable, or zero means "unknown".
fn declared_content_length(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|len| *len > 0)
}

/// Writes a body stream to `dest`, then verifies the declared length.
///
/// The partial file is removed if streaming or verification fails.
pub(crate) async fn write_stream<S, B>(
    stream: S,
    dest: &Path,
    url: &str,
    content_length: Option<u64>,
    progress: &ProgressBar,
) -> Result<u64, DownloadError>
where
    S: Stream<Item = Result<B, DownloadError>>,
    B: AsRef<[u8]>,
{
    let file = File::create(dest)
        .await
        .map_err(|e| DownloadError::io(dest, e))?;

    let mut bytes_written = 0;
    let result = match stream_to_file(file, stream, dest, progress, &mut bytes_written).await {
        Ok(()) => check_content_length(url, content_length, bytes_written).map(|()| bytes_written),
        // A connection closed short of the declared length surfaces as a body error.
        Err(e) if e.is_truncated_body() => match content_length {
            Some(expected) if bytes_written < expected => {
                Err(DownloadError::incomplete(url, expected, bytes_written))
            }
            _ => Err(e),
        },
        Err(e) => Err(e),
    };

    if result.is_err() {
        debug!(path = %dest.display(), "cleaning up partial file after error");
        let _ = tokio::fs::remove_file(dest).await;
    }
    result
}

async fn stream_to_file<S, B>(
    file: File,
    stream: S,
    dest: &Path,
    progress: &ProgressBar,
    bytes_written: &mut u64,
) -> Result<(), DownloadError>
where
    S: Stream<Item = Result<B, DownloadError>>,
    B: AsRef<[u8]>,
{
    let mut writer = BufWriter::new(file);
    let mut stream = std::pin::pin!(stream);

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        for piece in chunk.as_ref().chunks(CHUNK_SIZE) {
            writer
                .write_all(piece)
                .await
                .map_err(|e| DownloadError::io(dest, e))?;
            *bytes_written += piece.len() as u64;
            progress.inc(piece.len() as u64);
        }
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(dest, e))?;

    Ok(())
}

/// Compares bytes written against the declared length, if any.
pub(crate) fn check_content_length(
    url: &str,
    content_length: Option<u64>,
    bytes_written: u64,
) -> Result<(), DownloadError> {
    match content_length {
        Some(expected) if expected != bytes_written => {
            Err(DownloadError::incomplete(url, expected, bytes_written))
        }
        _ => Ok(()),
    }
}
