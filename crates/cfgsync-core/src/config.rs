use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Retry policy for the export request (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.25,
            max_delay_secs: 5,
        }
    }
}

/// Remote export service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL; requests go to `{endpoint}/bundles/{bundle}`.
    pub endpoint: String,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    /// Extra request headers, e.g. credentials injected by an outer tool.
    pub headers: BTreeMap<String, String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://mobile.us-east-1.amazonaws.com".to_string(),
            connect_timeout_secs: 15,
            timeout_secs: 30,
            headers: BTreeMap::new(),
        }
    }
}

/// Archive download transfer limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    pub connect_timeout_secs: u64,
    /// Abort when the transfer stays below this many bytes/sec ...
    pub low_speed_limit: u32,
    /// ... for this many seconds.
    pub low_speed_time_secs: u64,
    pub timeout_secs: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            low_speed_limit: 1024,
            low_speed_time_secs: 60,
            timeout_secs: 600,
        }
    }
}

/// Global configuration loaded from `~/.config/cfgsync/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Work directory for staging archives; system temp dir when unset.
    #[serde(default)]
    pub staging_dir: Option<PathBuf>,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    /// Optional retry policy for the export request; no retries when missing.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl SyncConfig {
    pub fn staging_dir(&self) -> PathBuf {
        self.staging_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("cfgsync")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SyncConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SyncConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: SyncConfig = toml::from_str(&data)?;
    Ok(cfg)
}
