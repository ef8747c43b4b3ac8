//! Per-run scratch directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

const SCRATCH_PREFIX: &str = "download-tarball-";

/// Temporary directory holding downloaded archives and extracted trees.
///
/// Removed by [`ScratchDir::cleanup`] at the end of a run, or on drop if the
/// run ends abnormally.
#[derive(Debug)]
pub struct ScratchDir {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl ScratchDir {
    /// Creates a fresh scratch directory under the system temp location.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the directory cannot be created.
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix(SCRATCH_PREFIX).tempdir()?;
        Ok(Self::from_temp_dir(dir))
    }

    /// Creates a scratch directory inside `parent`.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the directory cannot be created.
    pub fn new_in(parent: &Path) -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(parent)?;
        Ok(Self::from_temp_dir(dir))
    }

    fn from_temp_dir(dir: TempDir) -> Self {
        let path = dir.path().to_path_buf();
        debug!(path = %path.display(), "scratch directory created");
        Self {
            dir: Some(dir),
            path,
        }
    }

    /// Returns the directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the directory and everything in it.
    ///
    /// A failed normal removal is followed by a forced removal that first
    /// makes every entry writable.
    ///
    /// # Errors
    ///
    /// Returns the IO error of the forced removal if that fails as well.
    pub fn cleanup(mut self) -> io::Result<()> {
        let Some(dir) = self.dir.take() else {
            return Ok(());
        };
        match dir.close() {
            Ok(()) => {
                debug!(path = %self.path.display(), "scratch directory removed");
                Ok(())
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "scratch removal failed, forcing"
                );
                force_remove(&self.path).inspect_err(|e| {
                    warn!(
                        path = %self.path.display(),
                        error = %e,
                        "scratch directory could not be removed"
                    );
                })
            }
        }
    }
}

fn force_remove(path: &Path) -> io::Result<()> {
    if !path.exists() {
        return Ok(());
    }
    make_writable(path);
    fs::remove_dir_all(path)
}

fn make_writable(path: &Path) {
    let Ok(metadata) = fs::symlink_metadata(path) else {
        return;
    };
    if metadata.file_type().is_symlink() {
        return;
    }
    let mut permissions = metadata.permissions();
    if permissions.readonly() {
        #[allow(clippy::permissions_set_readonly_false)]
        permissions.set_readonly(false);
        let _ = fs::set_permissions(path, permissions);
    }
    if metadata.is_dir()
        && let Ok(entries) = fs::read_dir(path)
    {
        for entry in entries.flatten() {
            make_writable(&entry.path());
        }
    }
}
