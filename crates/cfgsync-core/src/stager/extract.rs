//! Unpack the bundle and find the target file in the extracted tree.

use crate::error::SyncError;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::ZipArchive;

/// Extract every entry of the zip at `archive` under `dest`.
pub(crate) fn extract_archive(archive: &Path, dest: &Path) -> Result<(), SyncError> {
    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(BufReader::new(file))?;
    zip.extract(dest)?;
    tracing::debug!(entries = zip.len(), dest = %dest.display(), "bundle extracted");
    Ok(())
}

/// First regular file named exactly `file_name` under `root`, walking
/// depth-first in file-name order. Unreadable entries fail the search.
pub(crate) fn find_file(root: &Path, file_name: &str) -> Result<Option<PathBuf>, SyncError> {
    let wanted = OsStr::new(file_name);
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_file() && entry.file_name() == wanted {
            return Ok(Some(entry.into_path()));
        }
    }
    Ok(None)
}
