//! Remote service boundary: "request export bundle".
//!
//! The pipeline only depends on [`BundleService`]. [`HttpBundleService`] is the
//! curl-backed implementation used by the CLI; tests substitute their own.

mod http;

pub use http::HttpBundleService;

use crate::platform::Platform;
use serde::Deserialize;
use thiserror::Error;

/// Parameters of one export request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBundleRequest {
    pub bundle_id: String,
    pub project_id: String,
    pub platform: Platform,
}

/// Service answer. `download_url` is absent when no bundle has been generated yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundleResponse {
    #[serde(default)]
    pub download_url: Option<String>,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("transport error: {0}")]
    Transport(#[from] curl::Error),

    #[error("service returned HTTP {status}: {body}")]
    Http { status: u32, body: String },

    #[error("invalid service response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid service endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("invalid retry settings: base_delay_secs {0}")]
    InvalidRetry(#[source] std::time::TryFromFloatSecsError),
}

/// Blocking export call. Implementations own any retry policy; callers run
/// this on a blocking thread.
pub trait BundleService: Send + Sync + 'static {
    fn export_bundle(
        &self,
        request: &ExportBundleRequest,
    ) -> Result<ExportBundleResponse, ServiceError>;
}
