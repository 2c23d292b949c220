//! Minimal HTTP/1.1 server standing in for the export service and the CDN.
//!
//! `POST /bundles/{id}?...` answers with `{"downloadUrl": "<base>download/bundle.zip"}`;
//! `GET /download/bundle.zip` serves the archive. Every response closes the
//! connection.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportReply {
    /// 200 with a download URL pointing back at this server.
    Bundle,
    /// 200 with `{}`: no bundle generated yet.
    NoBundle,
    /// Non-2xx status with a short body.
    Status(u16),
    /// 200 with a body that is not JSON.
    Garbage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveReply {
    Full,
    /// Advertise the full length but send only half, then close.
    Truncated,
    Status(u16),
}

#[derive(Debug, Clone, Copy)]
pub struct BundleServerOptions {
    pub export: ExportReply,
    /// Answer the first N export requests with 503 before applying `export`.
    pub fail_first: usize,
    pub archive: ArchiveReply,
}

impl Default for BundleServerOptions {
    fn default() -> Self {
        Self {
            export: ExportReply::Bundle,
            fail_first: 0,
            archive: ArchiveReply::Full,
        }
    }
}

/// Handle to a running server. The server runs until the process exits.
pub struct BundleServer {
    /// e.g. "http://127.0.0.1:12345/"
    pub base_url: String,
    export_requests: Arc<Mutex<Vec<String>>>,
    archive_requests: Arc<AtomicUsize>,
}

impl BundleServer {
    /// Raw request heads (request line + headers) of every export call.
    pub fn export_requests(&self) -> Vec<String> {
        self.export_requests.lock().unwrap().clone()
    }

    pub fn archive_requests(&self) -> usize {
        self.archive_requests.load(Ordering::SeqCst)
    }
}

pub fn start(archive: Vec<u8>) -> BundleServer {
    start_with_options(archive, BundleServerOptions::default())
}

pub fn start_with_options(archive: Vec<u8>, opts: BundleServerOptions) -> BundleServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let base_url = format!("http://127.0.0.1:{}/", port);

    let server = BundleServer {
        base_url: base_url.clone(),
        export_requests: Arc::new(Mutex::new(Vec::new())),
        archive_requests: Arc::new(AtomicUsize::new(0)),
    };
    let state = Arc::new(State {
        base_url,
        archive,
        opts,
        export_requests: Arc::clone(&server.export_requests),
        archive_requests: Arc::clone(&server.archive_requests),
    });

    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let state = Arc::clone(&state);
            thread::spawn(move || handle(stream, &state));
        }
    });
    server
}

struct State {
    base_url: String,
    archive: Vec<u8>,
    opts: BundleServerOptions,
    export_requests: Arc<Mutex<Vec<String>>>,
    archive_requests: Arc<AtomicUsize>,
}

fn read_head(stream: &mut TcpStream) -> Option<String> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    while !data.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return None,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
    }
    String::from_utf8(data).ok()
}

fn respond(stream: &mut TcpStream, status: &str, content_type: &str, body: &[u8]) {
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}

fn status_line(code: u16) -> String {
    let reason = match code {
        403 => "Forbidden",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Error",
    };
    format!("{} {}", code, reason)
}

fn handle(mut stream: TcpStream, state: &State) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let Some(head) = read_head(&mut stream) else {
        return;
    };
    let request_line = head.lines().next().unwrap_or("");
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("");

    if method.eq_ignore_ascii_case("POST") && path.starts_with("/bundles/") {
        let seen = {
            let mut reqs = state.export_requests.lock().unwrap();
            reqs.push(head.clone());
            reqs.len()
        };
        if seen <= state.opts.fail_first {
            respond(
                &mut stream,
                &status_line(503),
                "application/json",
                b"{\"message\":\"slow down\"}",
            );
            return;
        }
        match state.opts.export {
            ExportReply::Bundle => {
                let body = format!(
                    "{{\"downloadUrl\":\"{}download/bundle.zip\"}}",
                    state.base_url
                );
                respond(&mut stream, "200 OK", "application/json", body.as_bytes());
            }
            ExportReply::NoBundle => respond(&mut stream, "200 OK", "application/json", b"{}"),
            ExportReply::Status(code) => respond(
                &mut stream,
                &status_line(code),
                "application/json",
                b"{\"message\":\"request rejected\"}",
            ),
            ExportReply::Garbage => {
                respond(&mut stream, "200 OK", "text/html", b"<html>oops</html>")
            }
        }
        return;
    }

    if method.eq_ignore_ascii_case("GET") && path.starts_with("/download/") {
        state.archive_requests.fetch_add(1, Ordering::SeqCst);
        match state.opts.archive {
            ArchiveReply::Full => {
                respond(&mut stream, "200 OK", "application/zip", &state.archive)
            }
            ArchiveReply::Truncated => {
                let head = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/zip\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n",
                    state.archive.len()
                );
                let _ = stream.write_all(head.as_bytes());
                let _ = stream.write_all(&state.archive[..state.archive.len() / 2]);
            }
            ArchiveReply::Status(code) => {
                respond(&mut stream, &status_line(code), "text/plain", b"missing")
            }
        }
        return;
    }

    respond(&mut stream, "404 Not Found", "text/plain", b"");
}
