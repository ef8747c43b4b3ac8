//! Sequential processing of a package list.
//!
//! [`run_all`] feeds each package through the [`Pipeline`] in input order,
//! one at a time, and collects a [`RunReport`]. What happens after a failure
//! is governed by [`FailurePolicy`].

mod scratch;

use std::path::Path;

use tracing::{error, info, warn};

use crate::pipeline::{FailureKind, PackageReport, Pipeline};

pub use scratch::ScratchDir;

/// What to do with the remaining packages after one fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Record the failure and move on to the next package.
    #[default]
    Continue,
    /// Stop at the first failure; the rest are skipped.
    Abort,
}

impl FailurePolicy {
    /// Maps a fail-fast flag to a policy.
    #[must_use]
    pub fn from_fail_fast(fail_fast: bool) -> Self {
        if fail_fast { Self::Abort } else { Self::Continue }
    }
}

/// A package that did not install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageFailure {
    /// Package name as requested.
    pub package: String,
    /// Failure category.
    pub kind: FailureKind,
    /// Rendered error message.
    pub message: String,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Packages installed, in processing order.
    pub installed: Vec<PackageReport>,
    /// Packages that failed, in processing order.
    pub failed: Vec<PackageFailure>,
    /// Packages never attempted because the run was aborted.
    pub skipped: Vec<String>,
}

impl RunReport {
    /// Number of packages installed.
    #[must_use]
    pub fn installed_count(&self) -> usize {
        self.installed.len()
    }

    /// Number of packages that failed.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Number of packages processed or skipped.
    #[must_use]
    pub fn total(&self) -> usize {
        self.installed.len() + self.failed.len() + self.skipped.len()
    }

    /// True when nothing failed and nothing was skipped.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}

/// Runs the pipeline for every package in order.
///
/// Packages are never processed concurrently: the next one starts only after
/// the previous one has been installed or has failed.
pub async fn run_all(
    pipeline: &Pipeline,
    packages: &[String],
    scratch: &Path,
    policy: FailurePolicy,
) -> RunReport {
    let mut report = RunReport::default();

    for (position, package) in packages.iter().enumerate() {
        match pipeline.run_package(package, scratch).await {
            Ok(installed) => report.installed.push(installed),
            Err(e) => {
                let kind = e.kind();
                error!(package = %package, kind = %kind, error = %e, "package failed");
                report.failed.push(PackageFailure {
                    package: package.clone(),
                    kind,
                    message: e.to_string(),
                });

                if policy == FailurePolicy::Abort {
                    report.skipped = packages[position + 1..].to_vec();
                    if !report.skipped.is_empty() {
                        warn!(
                            skipped = report.skipped.len(),
                            "stopping after first failure"
                        );
                    }
                    break;
                }
            }
        }
    }

    info!(
        installed = report.installed_count(),
        failed = report.failed_count(),
        skipped = report.skipped.len(),
        "run finished"
    );
    report
}
