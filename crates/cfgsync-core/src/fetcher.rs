//! Ask the export service for a bundle handle.

use crate::error::SyncError;
use crate::platform::Platform;
use crate::service::{BundleService, ExportBundleRequest};
use std::sync::Arc;
use url::Url;

/// Bundle category for the application configuration bundle.
pub const APP_CONFIG_BUNDLE: &str = "app-config";

/// Short-lived reference returned by the service. Exchange it once with
/// [`BundleHandle::into_location`].
#[derive(Debug)]
pub struct BundleHandle {
    download_url: Option<String>,
}

impl BundleHandle {
    pub fn new(download_url: Option<String>) -> Self {
        Self { download_url }
    }

    /// Consume the handle. `None` when the service has no usable http(s)
    /// location (no bundle generated yet, or a malformed value).
    pub fn into_location(self) -> Option<Url> {
        let raw = self.download_url?;
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Some(url),
            Ok(url) => {
                tracing::warn!(scheme = url.scheme(), "ignoring non-http download location");
                None
            }
            Err(e) => {
                tracing::warn!("ignoring malformed download location: {}", e);
                None
            }
        }
    }
}

pub struct BundleFetcher<S> {
    service: Arc<S>,
}

impl<S: BundleService> BundleFetcher<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }

    /// Request the app-config bundle for `backend_project_id` / `platform`.
    /// The id must be non-empty; callers gate on that. No retry here.
    pub async fn fetch_bundle_handle(
        &self,
        backend_project_id: &str,
        platform: Platform,
    ) -> Result<BundleHandle, SyncError> {
        let request = ExportBundleRequest {
            bundle_id: APP_CONFIG_BUNDLE.to_string(),
            project_id: backend_project_id.to_string(),
            platform,
        };
        let service = Arc::clone(&self.service);
        let response = tokio::task::spawn_blocking(move || service.export_bundle(&request))
            .await??;
        Ok(BundleHandle::new(response.download_url))
    }
}
