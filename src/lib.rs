//! Download Tarball Library
//!
//! Installs Python packages from their source archives: the package index
//! page is scanned for a `.tar.gz` or `.zip` link, the archive is streamed to
//! a scratch directory, unpacked, and installed with its `setup.py`.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`manifest`] - Requirements file parsing
//! - [`index`] - Index page URLs and archive link selection
//! - [`download`] - HTTP client with streaming, length-checked downloads
//! - [`archive`] - Tarball and zip extraction
//! - [`install`] - Install plans and child process execution
//! - [`pipeline`] - The per-package stage sequence and its error taxonomy
//! - [`orchestrator`] - Sequential runs over a package list

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod archive;
pub mod download;
pub mod index;
pub mod install;
pub mod manifest;
pub mod orchestrator;
pub mod pipeline;
mod user_agent;

// Re-export commonly used types
pub use archive::{ArchiveKind, ExtractError, ExtractGate};
pub use download::{DownloadError, HttpClient};
pub use index::{CandidateLinks, IndexLocation, scan_links};
pub use install::{InstallError, InstallPlan, InstallSettings, Installer, ProcessInstaller};
pub use manifest::{ManifestError, parse_manifest, read_manifest};
pub use orchestrator::{FailurePolicy, PackageFailure, RunReport, ScratchDir, run_all};
pub use pipeline::{FailureKind, PackageReport, Pipeline, PipelineError};
