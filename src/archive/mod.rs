//! Source archive extraction.
//!
//! Archives are unpacked straight into the scratch directory with explicit
//! paths; the process working directory is never changed. The project root is
//! derived from the archive filename (see [`ArchiveKind::project_root_name`])
//! and must contain the build script.

mod error;
mod gate;
mod kind;
mod tarball;
mod zipfile;

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

use tracing::{debug, info, instrument};

pub use error::ExtractError;
pub use gate::ExtractGate;
pub use kind::{ArchiveKind, TAR_EXTENSION, ZIP_EXTENSION};

/// Build script expected at the root of every extracted project.
pub const BUILD_SCRIPT: &str = "setup.py";

/// An unpacked source archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedArchive {
    /// Project root directory inside the destination.
    pub root: PathBuf,
    /// Number of archive members written.
    pub entries: usize,
}

/// Unpacks `archive` into `dest` and returns the project root.
///
/// Extraction runs on the blocking pool and is awaited before returning.
///
/// # Errors
///
/// Returns `ExtractError` if the archive cannot be read or written out, or
/// if the directory named after the archive does not exist afterwards.
pub async fn extract(
    kind: ArchiveKind,
    archive: &Path,
    dest: &Path,
) -> Result<ExtractedArchive, ExtractError> {
    extract_with_gate(kind, archive, dest, &ExtractGate::new()).await
}

/// Like [`extract`], but stops between entries once `gate` is cancelled.
///
/// The blocking worker holds `gate` until it returns, so
/// [`ExtractGate::cancel_and_wait`] only resolves once nothing more will be
/// written under `dest`.
///
/// # Errors
///
/// As [`extract`], plus [`ExtractError::Cancelled`] when the gate was
/// cancelled before or during unpacking.
#[instrument(skip(archive, dest, gate), fields(archive = %archive.display()))]
pub async fn extract_with_gate(
    kind: ArchiveKind,
    archive: &Path,
    dest: &Path,
    gate: &ExtractGate,
) -> Result<ExtractedArchive, ExtractError> {
    let archive_owned = archive.to_path_buf();
    let dest_owned = dest.to_path_buf();
    let worker_gate = gate.clone();
    let busy = gate.enter().await;
    let entries = tokio::task::spawn_blocking(move || {
        let _busy = busy;
        unpack(kind, &archive_owned, &dest_owned, worker_gate.flag())
    })
    .await
    .map_err(|source| ExtractError::Task { source })??;

    let filename = archive
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let root = dest.join(kind.project_root_name(&filename));
    if !root.is_dir() {
        return Err(ExtractError::RootMissing {
            archive: archive.to_path_buf(),
            root,
        });
    }

    info!(root = %root.display(), entries, "extracted");
    Ok(ExtractedArchive { root, entries })
}

/// Synchronously unpacks `archive` into `dest`, dispatching on `kind`.
///
/// `cancelled` is checked before each entry.
///
/// # Errors
///
/// Returns `ExtractError` if the archive is unreadable or an entry cannot be
/// written, and [`ExtractError::Cancelled`] once `cancelled` is set.
pub fn unpack(
    kind: ArchiveKind,
    archive: &Path,
    dest: &Path,
    cancelled: &AtomicBool,
) -> Result<usize, ExtractError> {
    check_cancelled(archive, cancelled)?;
    std::fs::create_dir_all(dest).map_err(|e| ExtractError::io(dest, e))?;
    debug!(%kind, dest = %dest.display(), "unpacking");
    match kind {
        ArchiveKind::Tarball => tarball::unpack(archive, dest, cancelled),
        ArchiveKind::Zip => zipfile::unpack(archive, dest, cancelled),
    }
}

fn check_cancelled(archive: &Path, cancelled: &AtomicBool) -> Result<(), ExtractError> {
    if cancelled.load(std::sync::atomic::Ordering::SeqCst) {
        Err(ExtractError::Cancelled {
            archive: archive.to_path_buf(),
        })
    } else {
        Ok(())
    }
}

/// Returns the build script path under `root`.
///
/// # Errors
///
/// Returns [`ExtractError::BuildScriptMissing`] naming `package` when the
/// script is absent.
pub fn locate_build_script(root: &Path, package: &str) -> Result<PathBuf, ExtractError> {
    let script = root.join(BUILD_SCRIPT);
    if script.is_file() {
        Ok(script)
    } else {
        Err(ExtractError::BuildScriptMissing {
            package: package.to_string(),
            script: BUILD_SCRIPT,
            root: root.to_path_buf(),
        })
    }
}
