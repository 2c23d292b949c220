//! `cfgsync status` – show backend, platform and which copies exist.

use anyhow::Result;
use cfgsync_core::platform::{resolve_file_name, resolve_platform};
use cfgsync_core::ProjectDescriptor;
use std::path::Path;

fn presence(path: &Path) -> &'static str {
    if path.is_file() {
        "present"
    } else {
        "missing"
    }
}

pub fn run_status(root: &Path) -> Result<()> {
    let project = ProjectDescriptor::load(root)?;
    let file = resolve_file_name(&project);

    println!("{:<10} {}", "PROJECT", project.root.display());
    println!("{:<10} {}", "BACKEND", project.backend().unwrap_or("-"));
    println!("{:<10} {}", "FRAMEWORK", project.framework.as_deref().unwrap_or("-"));
    println!("{:<10} {}", "PLATFORM", resolve_platform(&project));

    let canonical = project.canonical_path(file);
    println!("{:<10} {} ({})", "FILE", canonical.display(), presence(&canonical));
    if let Some(mirror) = project.mirror_path(file) {
        println!("{:<10} {} ({})", "MIRROR", mirror.display(), presence(&mirror));
    }
    Ok(())
}
