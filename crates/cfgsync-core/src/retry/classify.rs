//! Map service failures onto retry kinds.

use super::policy::ErrorKind;
use crate::service::ServiceError;

pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Other,
    }
}

pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

pub fn classify(e: &ServiceError) -> ErrorKind {
    match e {
        ServiceError::Transport(ce) => classify_curl_error(ce),
        ServiceError::Http { status, .. } => classify_http_status(*status),
        ServiceError::Decode(_)
        | ServiceError::InvalidEndpoint(_)
        | ServiceError::InvalidRetry(_) => ErrorKind::Other,
    }
}
