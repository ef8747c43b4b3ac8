//! HTTP access for index pages and source archive downloads.
//!
//! # Features
//!
//! - Page fetches returned as text for link scanning
//! - Streaming archive downloads written in fixed 1024-byte chunks
//! - `Content-Length` integrity check (skipped when the header is absent or zero)
//! - Configurable timeouts (30s connect, 5min read by default)
//! - Optional terminal progress bar
//!
//! # Example
//!
//! ```no_run
//! use download_tarball::download::HttpClient;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let outcome = client
//!     .download_to_path(
//!         "https://files.pythonhosted.org/packages/source/t/tqdm/tqdm-4.28.1.tar.gz",
//!         Path::new("/tmp/tqdm-4.28.1.tar.gz"),
//!     )
//!     .await?;
//! println!("Downloaded {} bytes", outcome.bytes_written);
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;
mod filename;

pub use client::{DownloadOutcome, HttpClient};
pub use constants::{CHUNK_SIZE, CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
pub use error::DownloadError;
pub use filename::archive_filename;
