//! Errors surfaced by a retrieval attempt.
//!
//! "No backend provisioned" and "no bundle available" are not errors; the
//! pipeline reports them as `Ok(None)`.

use crate::service::ServiceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// The export request itself failed.
    #[error("bundle request failed: {0}")]
    Remote(#[from] ServiceError),

    /// The archive stream ended early or the connection dropped.
    #[error("download interrupted: {0}")]
    DownloadInterrupted(#[source] curl::Error),

    /// The download location answered with a non-2xx status.
    #[error("download failed: HTTP {0}")]
    DownloadStatus(u32),

    /// The archive could not be opened or unpacked.
    #[error("archive extraction failed: {0}")]
    Extraction(#[from] zip::result::ZipError),

    /// The archive was unpacked but does not contain the requested file.
    #[error("{file_name} not found in downloaded bundle")]
    ArtifactNotFound { file_name: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking staging task panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_not_found_names_file() {
        let err = SyncError::ArtifactNotFound {
            file_name: "aws-exports.js".to_string(),
        };
        assert_eq!(err.to_string(), "aws-exports.js not found in downloaded bundle");
    }

    #[test]
    fn remote_wraps_service_error() {
        let err: SyncError = ServiceError::Http {
            status: 403,
            body: "denied".to_string(),
        }
        .into();
        assert!(matches!(err, SyncError::Remote(_)));
        assert!(err.to_string().contains("HTTP 403"));
    }

    #[test]
    fn download_status_display() {
        assert_eq!(
            SyncError::DownloadStatus(404).to_string(),
            "download failed: HTTP 404"
        );
    }
}
