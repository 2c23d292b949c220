//! Single-stream GET of the bundle archive into an open file.

use crate::config::DownloadConfig;
use crate::error::SyncError;
use std::fs::File;
use std::io::{self, Write};
use std::time::Duration;

/// curl transfer limits for the archive download.
#[derive(Debug, Clone, Copy)]
pub struct DownloadOptions {
    pub connect_timeout: Duration,
    /// Abort when slower than this many bytes/sec for `low_speed_time`.
    pub low_speed_limit: u32,
    pub low_speed_time: Duration,
    pub timeout: Duration,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        DownloadOptions::from(&DownloadConfig::default())
    }
}

impl From<&DownloadConfig> for DownloadOptions {
    fn from(cfg: &DownloadConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            low_speed_limit: cfg.low_speed_limit,
            low_speed_time: Duration::from_secs(cfg.low_speed_time_secs),
            timeout: Duration::from_secs(cfg.timeout_secs),
        }
    }
}

fn configure(
    easy: &mut curl::easy::Easy,
    url: &str,
    opts: &DownloadOptions,
) -> Result<(), curl::Error> {
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.low_speed_limit(opts.low_speed_limit)?;
    easy.low_speed_time(opts.low_speed_time)?;
    easy.timeout(opts.timeout)?;
    Ok(())
}

/// Streams `url` into `file` chunk by chunk. Returns bytes written.
/// Blocking; run from `spawn_blocking`.
pub(crate) fn download_to_file(
    url: &str,
    file: &mut File,
    opts: &DownloadOptions,
) -> Result<u64, SyncError> {
    let mut written: u64 = 0;
    let mut write_err: Option<io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    configure(&mut easy, url, opts).map_err(SyncError::DownloadInterrupted)?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| match file.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    write_err = Some(e);
                    Ok(0) // abort transfer
                }
            })
            .map_err(SyncError::DownloadInterrupted)?;
        transfer.perform()
    };

    if let Some(e) = write_err {
        return Err(SyncError::Io(e));
    }
    performed.map_err(SyncError::DownloadInterrupted)?;

    let code = easy.response_code().map_err(SyncError::DownloadInterrupted)?;
    if !(200..300).contains(&code) {
        return Err(SyncError::DownloadStatus(code));
    }

    file.flush()?;
    file.sync_all()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::net::TcpListener;

    /// Serves `body` once with a 200 and returns the URL.
    fn serve_once(body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => return,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }
                let reply = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = stream.write_all(reply.as_bytes());
                let _ = stream.write_all(body);
            }
        });
        format!("http://127.0.0.1:{}/bundle.zip", port)
    }

    #[test]
    fn options_follow_config() {
        let cfg = DownloadConfig {
            connect_timeout_secs: 3,
            low_speed_limit: 10,
            low_speed_time_secs: 4,
            timeout_secs: 5,
        };
        let o = DownloadOptions::from(&cfg);
        assert_eq!(o.connect_timeout, Duration::from_secs(3));
        assert_eq!(o.low_speed_limit, 10);
        assert_eq!(o.low_speed_time, Duration::from_secs(4));
        assert_eq!(o.timeout, Duration::from_secs(5));
    }

    #[test]
    fn refused_connection_is_interrupted() {
        let mut f = tempfile::tempfile().unwrap();
        let opts = DownloadOptions {
            connect_timeout: Duration::from_secs(2),
            timeout: Duration::from_secs(5),
            ..Default::default()
        };
        let err = download_to_file("http://127.0.0.1:1/bundle.zip", &mut f, &opts).unwrap_err();
        assert!(matches!(err, SyncError::DownloadInterrupted(_)));
    }

    #[test]
    fn local_write_failure_is_io_error() {
        let url = serve_once(b"PK not really a zip, but bytes all the same");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.zip");
        std::fs::write(&path, b"").unwrap();
        // Read-only handle: every write fails.
        let mut file = File::open(&path).unwrap();

        let err = download_to_file(&url, &mut file, &DownloadOptions::default()).unwrap_err();
        assert!(matches!(err, SyncError::Io(_)), "{err}");
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
    }
}
