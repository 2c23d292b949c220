//! Retry and backoff for the export request.
//!
//! Only the HTTP service collaborator retries; the pipeline itself never does.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
