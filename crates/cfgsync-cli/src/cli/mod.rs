//! CLI for cfgsync.

mod commands;

use anyhow::Result;
use cfgsync_core::config;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use commands::{run_clear, run_pull, run_set_source_dir, run_status};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "cfgsync")]
#[command(about = "cfgsync: pull generated backend configuration", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download the configuration bundle and publish its file into the project.
    Pull {
        /// Project root (default: current directory).
        #[arg(long, value_name = "DIR")]
        project: Option<PathBuf>,
    },

    /// Change the project's source directory and move the mirrored copy along.
    SetSourceDir {
        /// New source directory, relative to the project root or absolute.
        #[arg(required_unless_present = "clear")]
        dir: Option<PathBuf>,
        /// Unset the source directory instead.
        #[arg(long, conflicts_with = "dir")]
        clear: bool,
        /// Project root (default: current directory).
        #[arg(long, value_name = "DIR")]
        project: Option<PathBuf>,
    },

    /// Remove the canonical and mirrored configuration files.
    Clear {
        /// Project root (default: current directory).
        #[arg(long, value_name = "DIR")]
        project: Option<PathBuf>,
    },

    /// Show the project's backend, resolved platform and configuration copies.
    Status {
        /// Project root (default: current directory).
        #[arg(long, value_name = "DIR")]
        project: Option<PathBuf>,
    },
}

fn project_root(project: Option<&Path>) -> Result<PathBuf> {
    match project {
        Some(p) => Ok(p.to_path_buf()),
        None => Ok(std::env::current_dir()?),
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Pull { project } => {
                run_pull(&cfg, &project_root(project.as_deref())?).await?
            }
            CliCommand::SetSourceDir {
                dir,
                clear,
                project,
            } => {
                let dir = if clear { None } else { dir };
                run_set_source_dir(&project_root(project.as_deref())?, dir)?
            }
            CliCommand::Clear { project } => run_clear(&project_root(project.as_deref())?)?,
            CliCommand::Status { project } => run_status(&project_root(project.as_deref())?)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
