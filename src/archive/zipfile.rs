//! Zip archive extraction.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;
use std::sync::atomic::AtomicBool;

use tracing::{trace, warn};
use zip::ZipArchive;

use super::check_cancelled;
use super::error::ExtractError;

/// Unpacks every entry of `archive` under `dest`.
///
/// Entries whose names would escape `dest` are skipped with a warning.
/// Returns the number of entries unpacked.
pub(crate) fn unpack(
    archive: &Path,
    dest: &Path,
    cancelled: &AtomicBool,
) -> Result<usize, ExtractError> {
    let file = File::open(archive).map_err(|e| ExtractError::io(archive, e))?;
    let mut zip =
        ZipArchive::new(BufReader::new(file)).map_err(|e| ExtractError::zip(archive, e))?;

    let mut unpacked = 0;
    for index in 0..zip.len() {
        check_cancelled(archive, cancelled)?;
        let mut entry = zip
            .by_index(index)
            .map_err(|e| ExtractError::zip(archive, e))?;
        let Some(relative) = entry.enclosed_name() else {
            warn!(entry = entry.name(), "skipping zip entry outside extraction directory");
            continue;
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| ExtractError::io(&out_path, e))?;
        } else {
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent).map_err(|e| ExtractError::io(parent, e))?;
            }
            let mut out = File::create(&out_path).map_err(|e| ExtractError::io(&out_path, e))?;
            io::copy(&mut entry, &mut out).map_err(|e| ExtractError::io(&out_path, e))?;

            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&out_path, fs::Permissions::from_mode(mode))
                    .map_err(|e| ExtractError::io(&out_path, e))?;
            }
        }
        trace!(entry = %out_path.display(), "unpacked");
        unpacked += 1;
    }
    Ok(unpacked)
}
