pub mod config;
pub mod error;
pub mod logging;

pub mod fetcher;
pub mod pipeline;
pub mod platform;
pub mod project;
pub mod retry;
pub mod service;
pub mod stager;
pub mod sync;

pub use error::SyncError;
pub use pipeline::ConfigSync;
pub use project::ProjectDescriptor;
