//! Download, extract and locate the configuration file for one retrieval.
//!
//! Both staging resources live under the work dir and are owned by RAII
//! guards: the archive is a `NamedTempFile` removed right after extraction,
//! the extraction tree is a `TempDir` owned by [`StagedArtifact`]. Every
//! error path drops whatever was created before `stage` returns.

mod download;
mod extract;

pub use download::DownloadOptions;

use crate::config::SyncConfig;
use crate::error::SyncError;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};
use url::Url;

const ARCHIVE_PREFIX: &str = "cfgsync-bundle-";
const EXTRACT_PREFIX: &str = "cfgsync-extract-";

/// Extracted bundle holding the located target file. The extraction tree is
/// removed on [`close`](Self::close) or drop.
#[derive(Debug)]
pub struct StagedArtifact {
    dir: TempDir,
    path: PathBuf,
}

impl StagedArtifact {
    /// Located target file inside the extraction tree.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Root of the extraction tree.
    pub fn extract_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the extraction tree, reporting failure instead of ignoring it.
    pub fn close(self) -> io::Result<()> {
        self.dir.close()
    }
}

#[derive(Debug, Clone)]
pub struct ArtifactStager {
    work_dir: PathBuf,
    download: DownloadOptions,
}

impl ArtifactStager {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            download: DownloadOptions::default(),
        }
    }

    pub fn from_config(cfg: &SyncConfig) -> Self {
        Self::new(cfg.staging_dir()).with_download_options(DownloadOptions::from(&cfg.download))
    }

    pub fn with_download_options(mut self, download: DownloadOptions) -> Self {
        self.download = download;
        self
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Download `location`, extract it and locate `file_name`.
    pub async fn stage(
        &self,
        location: &Url,
        file_name: &str,
    ) -> Result<StagedArtifact, SyncError> {
        tokio::fs::create_dir_all(&self.work_dir).await?;
        let archive = tempfile::Builder::new()
            .prefix(ARCHIVE_PREFIX)
            .suffix(".zip")
            .tempfile_in(&self.work_dir)?;
        tracing::debug!(
            archive = %archive.path().display(),
            url = %location,
            "downloading bundle"
        );

        let archive = tokio::task::spawn_blocking({
            let url = location.to_string();
            let opts = self.download;
            move || -> Result<NamedTempFile, SyncError> {
                let mut archive = archive;
                let bytes = download::download_to_file(&url, archive.as_file_mut(), &opts)?;
                tracing::debug!(bytes, "bundle downloaded");
                Ok(archive)
            }
        })
        .await??;

        tokio::task::spawn_blocking({
            let work_dir = self.work_dir.clone();
            let file_name = file_name.to_string();
            move || extract_and_locate(archive, &work_dir, &file_name)
        })
        .await?
    }
}

fn extract_and_locate(
    archive: NamedTempFile,
    work_dir: &Path,
    file_name: &str,
) -> Result<StagedArtifact, SyncError> {
    let dir = tempfile::Builder::new()
        .prefix(EXTRACT_PREFIX)
        .tempdir_in(work_dir)?;
    let extracted = extract::extract_archive(archive.path(), dir.path());
    discard_archive(archive);
    extracted?;

    let path = extract::find_file(dir.path(), file_name)?.ok_or_else(|| {
        SyncError::ArtifactNotFound {
            file_name: file_name.to_string(),
        }
    })?;
    tracing::debug!(path = %path.display(), "located {}", file_name);
    Ok(StagedArtifact { dir, path })
}

fn discard_archive(archive: NamedTempFile) {
    let path = archive.path().to_path_buf();
    if let Err(e) = archive.close() {
        tracing::warn!(path = %path.display(), "could not remove staged archive: {}", e);
    }
}
