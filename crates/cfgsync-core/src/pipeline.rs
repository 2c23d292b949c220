//! Top-level retrieval: resolve, fetch, stage, publish.

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::fetcher::BundleFetcher;
use crate::platform::{resolve_file_name, resolve_platform};
use crate::project::ProjectDescriptor;
use crate::service::{BundleService, HttpBundleService, ServiceError};
use crate::stager::ArtifactStager;
use crate::sync::{self, PublishedArtifact};
use std::sync::Arc;

/// One retrieval pipeline. Not safe to run twice concurrently for the same
/// project: the work dir and canonical path are shared without locking.
pub struct ConfigSync<S> {
    fetcher: BundleFetcher<S>,
    stager: ArtifactStager,
}

impl ConfigSync<HttpBundleService> {
    pub fn from_config(cfg: &SyncConfig) -> Result<Self, ServiceError> {
        let service = HttpBundleService::from_config(cfg)?;
        Ok(Self::new(Arc::new(service), ArtifactStager::from_config(cfg)))
    }
}

impl<S: BundleService> ConfigSync<S> {
    pub fn new(service: Arc<S>, stager: ArtifactStager) -> Self {
        Self {
            fetcher: BundleFetcher::new(service),
            stager,
        }
    }

    pub fn stager(&self) -> &ArtifactStager {
        &self.stager
    }

    /// Retrieve and publish the configuration file for `project`.
    ///
    /// `Ok(None)` when no backend is provisioned or the service has no bundle
    /// yet. On error the canonical and mirror copies are untouched and no
    /// staging files remain.
    pub async fn pull(
        &self,
        project: &ProjectDescriptor,
    ) -> Result<Option<PublishedArtifact>, SyncError> {
        let Some(backend) = project.backend() else {
            tracing::debug!(root = %project.root.display(), "no backend provisioned, skipping");
            return Ok(None);
        };
        self.retrieve(project, backend).await.inspect_err(|e| {
            tracing::warn!(backend, "configuration retrieval aborted: {}", e);
        })
    }

    async fn retrieve(
        &self,
        project: &ProjectDescriptor,
        backend: &str,
    ) -> Result<Option<PublishedArtifact>, SyncError> {
        let platform = resolve_platform(project);
        let file = resolve_file_name(project);
        tracing::info!(backend, %platform, "retrieving {}", file);

        let handle = self.fetcher.fetch_bundle_handle(backend, platform).await?;
        let Some(location) = handle.into_location() else {
            tracing::info!(backend, "no configuration bundle available");
            return Ok(None);
        };

        let staged = self.stager.stage(&location, file.as_str()).await?;
        let published = sync::publish(project, staged.path(), file);
        let extract_dir = staged.extract_dir().to_path_buf();
        if let Err(e) = staged.close() {
            tracing::warn!(
                path = %extract_dir.display(),
                "could not remove staging directory: {}",
                e
            );
        }
        Ok(Some(published?))
    }
}
