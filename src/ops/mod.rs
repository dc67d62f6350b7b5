pub mod project_ops;
pub mod resolver;
pub mod workspace_ops;

use std::path::PathBuf;

use crate::io::config_store::ConfigError;
use crate::shell::CloneError;

/// Error type for workspace and project operations
#[derive(Debug, thiserror::Error)]
pub enum OpsError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("Project '{0}' already exists.")]
    ProjectExists(String),
    #[error("Directory '{}' already exists.", .0.display())]
    DirectoryExists(PathBuf),
    #[error("Project '{0}' not found")]
    ProjectNotFound(String),
    #[error("workspace not found: {}", .0.display())]
    WorkspaceNotFound(PathBuf),
    #[error("Workspace with name '{0}' already exists.")]
    WorkspaceNameTaken(String),
    #[error("Invalid project name '{0}'")]
    InvalidName(String),
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Clone failed: {0}")]
    Clone(#[from] CloneError),
    #[error("Invalid status '{0}'. Valid: active, archived, done, not set")]
    InvalidStatus(String),
}

impl OpsError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> OpsError {
        let path = path.into();
        move |source| OpsError::Io { path, source }
    }
}
