//! curl-backed export service.
//!
//! `POST {endpoint}/bundles/{bundle_id}?projectId=..&platform=..` with an empty
//! body; the JSON reply carries `downloadUrl`.

use super::{BundleService, ExportBundleRequest, ExportBundleResponse, ServiceError};
use crate::config::SyncConfig;
use crate::retry::{run_with_retry, RetryPolicy};
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// Largest error body kept for the error message.
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Clone)]
pub struct HttpBundleService {
    endpoint: Url,
    headers: BTreeMap<String, String>,
    connect_timeout: Duration,
    timeout: Duration,
    retry: Option<RetryPolicy>,
}

impl HttpBundleService {
    pub fn new(endpoint: &str) -> Result<Self, ServiceError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| ServiceError::InvalidEndpoint(format!("{endpoint}: {e}")))?;
        if endpoint.cannot_be_a_base() {
            return Err(ServiceError::InvalidEndpoint(endpoint.to_string()));
        }
        Ok(Self {
            endpoint,
            headers: BTreeMap::new(),
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(30),
            retry: None,
        })
    }

    pub fn from_config(cfg: &SyncConfig) -> Result<Self, ServiceError> {
        let mut svc = Self::new(&cfg.service.endpoint)?;
        svc.headers = cfg.service.headers.clone();
        svc.connect_timeout = Duration::from_secs(cfg.service.connect_timeout_secs);
        svc.timeout = Duration::from_secs(cfg.service.timeout_secs);
        svc.retry = cfg
            .retry
            .as_ref()
            .map(RetryPolicy::try_from)
            .transpose()
            .map_err(ServiceError::InvalidRetry)?;
        Ok(svc)
    }

    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Full request URL for `request`.
    pub fn export_url(&self, request: &ExportBundleRequest) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("bundles").push(&request.bundle_id);
        }
        url.query_pairs_mut()
            .append_pair("projectId", &request.project_id)
            .append_pair("platform", request.platform.as_str());
        url
    }

    fn request_once(&self, url: &str) -> Result<ExportBundleResponse, ServiceError> {
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.post(true)?;
        easy.post_fields_copy(b"")?;
        easy.follow_location(true)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;

        let mut list = curl::easy::List::new();
        list.append("Accept: application/json")?;
        for (k, v) in &self.headers {
            list.append(&format!("{}: {}", k.trim(), v.trim()))?;
        }
        easy.http_headers(list)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        if !(200..300).contains(&status) {
            let mut text = String::from_utf8_lossy(&body).into_owned();
            if text.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !text.is_char_boundary(cut) {
                    cut -= 1;
                }
                text.truncate(cut);
            }
            return Err(ServiceError::Http { status, body: text });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

impl BundleService for HttpBundleService {
    fn export_bundle(
        &self,
        request: &ExportBundleRequest,
    ) -> Result<ExportBundleResponse, ServiceError> {
        let url = self.export_url(request);
        tracing::debug!(url = %url, "requesting export bundle");
        match &self.retry {
            Some(policy) => run_with_retry(policy, || self.request_once(url.as_str())),
            None => self.request_once(url.as_str()),
        }
    }
}
