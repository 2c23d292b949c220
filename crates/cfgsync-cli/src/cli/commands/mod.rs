//! CLI command handlers, one per file.

mod clear;
mod pull;
mod set_source_dir;
mod status;

pub use clear::run_clear;
pub use pull::run_pull;
pub use set_source_dir::run_set_source_dir;
pub use status::run_status;
