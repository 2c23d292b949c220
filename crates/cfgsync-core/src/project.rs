//! Project descriptor and its on-disk form (`<root>/.cfgsync/project.json`).
//!
//! The descriptor is passed explicitly into every pipeline and synchronizer
//! operation; nothing here is cached between calls.

use crate::platform::ConfigFileName;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory under the project root holding cfgsync state.
pub const STATE_DIR: &str = ".cfgsync";
/// Descriptor file name inside [`STATE_DIR`].
pub const PROJECT_FILE: &str = "project.json";

/// Errors loading or saving the stored descriptor.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("no cfgsync project at {0} (missing .cfgsync/project.json)")]
    NotFound(PathBuf),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid project file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only view of a project as the pipeline sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    /// Project root; canonical copies live directly under it.
    pub root: PathBuf,
    /// Backend project id. `None` or empty means no backend is provisioned.
    pub backend_project_id: Option<String>,
    /// Declared client framework, as written by the user.
    pub framework: Option<String>,
    /// Secondary source directory. Relative paths are resolved against `root`.
    pub source_dir: Option<PathBuf>,
}

/// Serialized shape of `project.json`. The root is implied by the file location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ProjectFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    backend_project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    framework: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_dir: Option<PathBuf>,
}

impl ProjectDescriptor {
    /// Descriptor with only a root: no backend, default framework, no source dir.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            backend_project_id: None,
            framework: None,
            source_dir: None,
        }
    }

    /// Backend id if one is provisioned (present and non-empty).
    pub fn backend(&self) -> Option<&str> {
        self.backend_project_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Absolute secondary source directory, if configured.
    pub fn source_dir_path(&self) -> Option<PathBuf> {
        self.source_dir.as_ref().map(|dir| self.root.join(dir))
    }

    /// Canonical location of `file` under the project root.
    pub fn canonical_path(&self, file: ConfigFileName) -> PathBuf {
        self.root.join(file.as_str())
    }

    /// Mirror location of `file` under the source directory, if one is configured.
    pub fn mirror_path(&self, file: ConfigFileName) -> Option<PathBuf> {
        self.source_dir_path().map(|dir| dir.join(file.as_str()))
    }

    /// Path of the descriptor file for a project rooted at `root`.
    pub fn file_path(root: &Path) -> PathBuf {
        root.join(STATE_DIR).join(PROJECT_FILE)
    }

    /// Load the stored descriptor for the project rooted at `root`.
    pub fn load(root: &Path) -> Result<Self, ProjectError> {
        let path = Self::file_path(root);
        let data = match fs::read_to_string(&path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ProjectError::NotFound(root.to_path_buf()))
            }
            Err(source) => return Err(ProjectError::Io { path, source }),
        };
        let file: ProjectFile =
            serde_json::from_str(&data).map_err(|source| ProjectError::Json {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            root: root.to_path_buf(),
            backend_project_id: file.backend_project_id,
            framework: file.framework,
            source_dir: file.source_dir,
        })
    }

    /// Write the descriptor to `<root>/.cfgsync/project.json`, creating the state dir.
    pub fn save(&self) -> Result<(), ProjectError> {
        let path = Self::file_path(&self.root);
        let io_err = |source| ProjectError::Io {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let file = ProjectFile {
            backend_project_id: self.backend_project_id.clone(),
            framework: self.framework.clone(),
            source_dir: self.source_dir.clone(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|source| ProjectError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(io_err)?;
        Ok(())
    }
}
