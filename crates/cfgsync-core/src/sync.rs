//! Canonical and mirror copies of the configuration file.
//!
//! Copies are only ever replaced whole (temp file in the destination
//! directory, then rename) or deleted. Every delete and copy is preceded by an
//! existence check; a missing file is the normal state, not an error.

use crate::platform::{resolve_file_name, ConfigFileName};
use crate::project::ProjectDescriptor;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

const BUF_SIZE: usize = 64 * 1024;

/// Outcome of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedArtifact {
    pub file_name: ConfigFileName,
    /// Canonical path that now holds the file.
    pub path: PathBuf,
    pub bytes: u64,
    /// Lowercase hex SHA-256 of the published content.
    pub sha256: String,
}

impl PublishedArtifact {
    /// Canonical path relative to the project root, for display.
    pub fn relative_path<'a>(&'a self, project: &ProjectDescriptor) -> &'a Path {
        self.path.strip_prefix(&project.root).unwrap_or(&self.path)
    }
}

/// Replace `dest` with the content of `src`. Returns (bytes, sha256 hex).
fn replace_file(src: &Path, dest: &Path) -> io::Result<(u64, String)> {
    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut reader = File::open(src)?;
    let mut tmp = tempfile::Builder::new()
        .prefix(".cfgsync-")
        .tempfile_in(parent)?;

    let mut hasher = Sha256::new();
    let mut bytes = 0u64;
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        tmp.write_all(&buf[..n])?;
        bytes += n as u64;
    }
    tmp.as_file().set_permissions(fs::metadata(src)?.permissions())?;
    tmp.as_file().sync_all()?;
    tmp.persist(dest).map_err(|e| e.error)?;

    Ok((bytes, hex::encode(hasher.finalize())))
}

/// Delete `path` if it is a file. Returns whether something was removed.
fn remove_if_present(path: &Path) -> io::Result<bool> {
    if !path.is_file() {
        return Ok(false);
    }
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Overwrite the canonical copy of `file` with the staged file. The mirror is
/// left alone; it follows source-dir changes only.
pub fn publish(
    project: &ProjectDescriptor,
    staged: &Path,
    file: ConfigFileName,
) -> io::Result<PublishedArtifact> {
    let dest = project.canonical_path(file);
    let (bytes, sha256) = replace_file(staged, &dest)?;
    tracing::info!(path = %dest.display(), bytes, sha256 = %sha256, "published {}", file);
    Ok(PublishedArtifact {
        file_name: file,
        path: dest,
        bytes,
        sha256,
    })
}

/// Move the mirror when the source directory setting changes. Returns the new
/// mirror path when one was written.
pub fn on_source_dir_changed(
    old: &ProjectDescriptor,
    new: &ProjectDescriptor,
) -> io::Result<Option<PathBuf>> {
    if old.source_dir_path() == new.source_dir_path() {
        return Ok(None);
    }

    let old_file = resolve_file_name(old);
    if let Some(old_mirror) = old.mirror_path(old_file) {
        // A source dir equal to the root would make the mirror the canonical copy.
        if old_mirror != old.canonical_path(old_file) && remove_if_present(&old_mirror)? {
            tracing::info!(path = %old_mirror.display(), "removed old mirror");
        }
    }

    let file = resolve_file_name(new);
    let canonical = new.canonical_path(file);
    if !canonical.is_file() {
        return Ok(None);
    }
    let Some(dir) = new.source_dir_path() else {
        return Ok(None);
    };
    if !dir.is_dir() {
        tracing::debug!(dir = %dir.display(), "source directory missing, no mirror");
        return Ok(None);
    }
    let mirror = dir.join(file.as_str());
    if mirror == canonical {
        return Ok(None);
    }
    replace_file(&canonical, &mirror)?;
    tracing::info!(path = %mirror.display(), "{} copied into source directory", file);
    Ok(Some(mirror))
}

/// Delete the canonical copy and the mirror, whichever exist. Returns the
/// removed paths.
pub fn remove_all(project: &ProjectDescriptor) -> io::Result<Vec<PathBuf>> {
    let file = resolve_file_name(project);
    let mut removed = Vec::new();

    let canonical = project.canonical_path(file);
    if remove_if_present(&canonical)? {
        removed.push(canonical);
    }

    if let Some(dir) = project.source_dir_path() {
        if dir.is_dir() {
            let mirror = dir.join(file.as_str());
            if remove_if_present(&mirror)? {
                removed.push(mirror);
            }
        }
    }

    for path in &removed {
        tracing::info!(path = %path.display(), "removed {}", file);
    }
    Ok(removed)
}
