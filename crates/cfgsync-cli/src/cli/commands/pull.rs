//! `cfgsync pull` – retrieve the configuration bundle and publish its file.

use anyhow::{Context, Result};
use cfgsync_core::config::SyncConfig;
use cfgsync_core::{ConfigSync, ProjectDescriptor};
use std::path::Path;

/// Prints the published location; prints nothing when there is no backend or
/// no bundle yet.
pub async fn run_pull(cfg: &SyncConfig, root: &Path) -> Result<()> {
    let project = ProjectDescriptor::load(root)?;
    let sync = ConfigSync::from_config(cfg).context("configure export service")?;

    match sync.pull(&project).await? {
        Some(published) => {
            println!("backend configuration written to:");
            println!("    {}", published.relative_path(&project).display());
        }
        None => tracing::debug!("nothing retrieved for {}", root.display()),
    }
    Ok(())
}
