//! `cfgsync clear` – delete the canonical and mirrored copies.

use anyhow::{Context, Result};
use cfgsync_core::{sync, ProjectDescriptor};
use std::path::Path;

pub fn run_clear(root: &Path) -> Result<()> {
    let project = ProjectDescriptor::load(root)?;
    let removed = sync::remove_all(&project).context("remove configuration files")?;
    for path in removed {
        println!("Removed {}", path.display());
    }
    Ok(())
}
