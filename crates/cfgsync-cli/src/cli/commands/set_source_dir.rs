//! `cfgsync set-source-dir <dir>|--clear` – update the source dir and re-mirror.

use anyhow::{Context, Result};
use cfgsync_core::{sync, ProjectDescriptor};
use std::path::{Path, PathBuf};

pub fn run_set_source_dir(root: &Path, dir: Option<PathBuf>) -> Result<()> {
    let old = ProjectDescriptor::load(root)?;
    let mut new = old.clone();
    new.source_dir = dir;
    new.save()?;

    let mirror = sync::on_source_dir_changed(&old, &new).context("update mirrored copy")?;
    if let Some(path) = mirror {
        println!("configuration copied into the source directory:");
        println!("    {}", path.display());
    }
    Ok(())
}
