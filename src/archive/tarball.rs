//! Gzip-compressed tarball extraction.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::AtomicBool;

use flate2::read::GzDecoder;
use tracing::{trace, warn};

use super::check_cancelled;
use super::error::ExtractError;

/// Unpacks every member of `archive` under `dest`.
///
/// Members whose paths would escape `dest` are skipped with a warning.
/// Returns the number of members unpacked.
pub(crate) fn unpack(
    archive: &Path,
    dest: &Path,
    cancelled: &AtomicBool,
) -> Result<usize, ExtractError> {
    let file = File::open(archive).map_err(|e| ExtractError::io(archive, e))?;
    let mut tar = tar::Archive::new(GzDecoder::new(BufReader::new(file)));

    let mut unpacked = 0;
    let entries = tar.entries().map_err(|e| ExtractError::tar(archive, e))?;
    for entry in entries {
        check_cancelled(archive, cancelled)?;
        let mut entry = entry.map_err(|e| ExtractError::tar(archive, e))?;
        let member = entry.path().map(|p| p.display().to_string()).unwrap_or_default();
        if entry
            .unpack_in(dest)
            .map_err(|e| ExtractError::tar(archive, e))?
        {
            trace!(%member, "unpacked");
            unpacked += 1;
        } else {
            warn!(%member, "skipping tar member outside extraction directory");
        }
    }
    Ok(unpacked)
}
