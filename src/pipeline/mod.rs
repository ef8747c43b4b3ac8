//! The per-package install pipeline.
//!
//! One package goes through, strictly in order: index page fetch, archive
//! link selection, download, extraction, build script check, and install.
//! Each stage returns before the next begins; a failure at any stage ends the
//! pipeline for that package with a [`PipelineError`].

mod error;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::archive::{self, ArchiveKind, ExtractGate};
use crate::download::{HttpClient, archive_filename};
use crate::index::{IndexLocation, scan_links};
use crate::install::{InstallPlan, InstallSettings, Installer};

pub use error::{FailureKind, PipelineError};

/// What a successful pipeline run did for one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReport {
    /// Package name as requested.
    pub package: String,
    /// Archive kind that was selected.
    pub kind: ArchiveKind,
    /// URL the archive was downloaded from.
    pub archive_url: String,
    /// Bytes written to disk.
    pub bytes: u64,
    /// Extracted project root.
    pub root: PathBuf,
    /// Whether `requirements.txt` was installed first.
    pub installed_requirements: bool,
}

/// Fetches, unpacks, and installs packages one at a time.
pub struct Pipeline {
    client: HttpClient,
    index: IndexLocation,
    installer: Arc<dyn Installer>,
    settings: InstallSettings,
    extract_gate: ExtractGate,
}

impl Pipeline {
    /// Creates a pipeline from its collaborators.
    #[must_use]
    pub fn new(
        client: HttpClient,
        index: IndexLocation,
        installer: Arc<dyn Installer>,
        settings: InstallSettings,
    ) -> Self {
        Self {
            client,
            index,
            installer,
            settings,
            extract_gate: ExtractGate::new(),
        }
    }

    /// Returns the index this pipeline scans.
    #[must_use]
    pub fn index(&self) -> &IndexLocation {
        &self.index
    }

    /// Returns the gate that stops this pipeline's extractions.
    ///
    /// Cancel it before removing the scratch directory of an interrupted run.
    #[must_use]
    pub fn extract_gate(&self) -> &ExtractGate {
        &self.extract_gate
    }

    /// Runs every stage for `package`, using `scratch` for the archive and
    /// its extracted tree.
    ///
    /// # Errors
    ///
    /// Returns the [`PipelineError`] of the first stage that fails.
    #[instrument(skip(self, scratch), fields(package = %package))]
    pub async fn run_package(
        &self,
        package: &str,
        scratch: &Path,
    ) -> Result<PackageReport, PipelineError> {
        let request = self.index.request(package);
        info!(url = %request.page_url, "requesting index page");
        let html = self
            .client
            .fetch_page(&request.page_url)
            .await
            .map_err(|source| PipelineError::IndexFetch {
                package: package.to_string(),
                source,
            })?;

        let links = scan_links(&html, &request.page_url);
        let (kind, url) = links.select().ok_or_else(|| PipelineError::ArchiveNotFound {
            package: package.to_string(),
            url: request.page_url.clone(),
        })?;
        let archive_url = url.to_string();
        info!(%kind, url = %archive_url, "source archive found");

        let filename =
            archive_filename(&archive_url, kind).map_err(|source| PipelineError::Download {
                package: package.to_string(),
                source,
            })?;
        let archive_path = scratch.join(&filename);
        info!(file = %filename, "downloading");
        let outcome = self
            .client
            .download_to_path(&archive_url, &archive_path)
            .await
            .map_err(|source| PipelineError::Download {
                package: package.to_string(),
                source,
            })?;

        info!(file = %filename, "extracting");
        let extracted =
            archive::extract_with_gate(kind, &outcome.path, scratch, &self.extract_gate).await?;
        let script = archive::locate_build_script(&extracted.root, package)?;
        debug!(script = %script.display(), "build script located");

        let plan = InstallPlan::for_root(&extracted.root, &self.settings);
        if plan.installs_requirements() {
            info!("installing dependencies from requirements file");
        }
        info!("installing");
        self.installer
            .install(&plan, &extracted.root)
            .await
            .map_err(|source| PipelineError::Install {
                package: package.to_string(),
                source,
            })?;

        info!("installed");
        Ok(PackageReport {
            package: package.to_string(),
            kind,
            archive_url,
            bytes: outcome.bytes_written,
            root: extracted.root,
            installed_requirements: plan.installs_requirements(),
        })
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("index", &self.index)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
