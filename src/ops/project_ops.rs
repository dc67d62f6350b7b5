use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::model::{Config, Project, Status};
use crate::ops::OpsError;
use crate::ops::resolver::{self, DOCS_DIR, PROJECT_DIR, REPO_DIR, SECRET_DIR};
use crate::shell::ShellBridge;

/// Where a new project's `repo/` comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectSource {
    /// Create `repo/`, `docs/` and `secret/` empty
    Empty,
    /// Clone this URL into `repo/`
    Clone(String),
}

/// Reject names that cannot be a single directory component. Returns the
/// name with surrounding whitespace removed.
pub fn validate_name(name: &str) -> Result<&str, OpsError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed.contains(['/', '\\'])
        || trimmed == "."
        || trimmed == ".."
    {
        return Err(OpsError::InvalidName(name.to_string()));
    }
    Ok(trimmed)
}

/// Root directory of a project: `<workspace>/project/<name>`.
pub fn project_path(workspace: &Path, name: &str) -> PathBuf {
    workspace.join(PROJECT_DIR).join(name)
}

/// Preconditions for adding `name` to `workspace`: a valid, unused name whose
/// directory does not exist yet. Returns the directory it would live in.
pub fn check_new_project(cfg: &Config, workspace: &Path, name: &str) -> Result<PathBuf, OpsError> {
    let name = validate_name(name)?;
    if cfg.contains(name) {
        return Err(OpsError::ProjectExists(name.to_string()));
    }
    let path = project_path(workspace, name);
    if path.exists() {
        return Err(OpsError::DirectoryExists(path));
    }
    Ok(path)
}

/// Create `repo/`, `docs/` and `secret/` under `root`. Existing directories
/// are kept.
pub fn create_layout(root: &Path) -> Result<(), OpsError> {
    for sub in [REPO_DIR, DOCS_DIR, SECRET_DIR] {
        let dir = root.join(sub);
        fs::create_dir_all(&dir).map_err(OpsError::io(&dir))?;
    }
    Ok(())
}

/// Register `name` as an active project at `path` and make sure its
/// workspace is listed.
fn register(cfg: &mut Config, workspace: &Path, name: &str, path: PathBuf) -> Project {
    cfg.add_workspace(workspace);
    let project = Project::new(name, path, Status::Active);
    cfg.insert(project.clone());
    info!(project = name, path = %project.path.display(), "project registered");
    project
}

/// Add a new project to `workspace`, creating its directory layout or
/// cloning into it. Nothing is registered if the clone fails.
pub fn add_project(
    cfg: &mut Config,
    workspace: &Path,
    name: &str,
    source: &ProjectSource,
    shell: &dyn ShellBridge,
) -> Result<Project, OpsError> {
    let name = validate_name(name)?;
    let path = check_new_project(cfg, workspace, name)?;
    match source {
        ProjectSource::Empty => create_layout(&path)?,
        ProjectSource::Clone(url) => {
            for sub in [DOCS_DIR, SECRET_DIR] {
                let dir = path.join(sub);
                fs::create_dir_all(&dir).map_err(OpsError::io(&dir))?;
            }
            if let Err(e) = shell.clone_repository(url, &path.join(REPO_DIR)) {
                error!(url = %url, error = %e, "clone failed");
                // leave no half-built project behind so the name can be retried
                let _ = fs::remove_dir_all(&path);
                return Err(e.into());
            }
        }
    }
    Ok(register(cfg, workspace, name, path))
}

/// `init --project`: create the layout (tolerating existing directories) and
/// register the project, replacing any previous record with that name.
pub fn init_project(cfg: &mut Config, workspace: &Path, name: &str) -> Result<Project, OpsError> {
    let name = validate_name(name)?;
    let path = project_path(workspace, name);
    create_layout(&path)?;
    Ok(register(cfg, workspace, name, path))
}

/// Unregister a configured project (by name or alias) with all its aliases.
pub fn remove_project(cfg: &mut Config, key: &str) -> Result<Project, OpsError> {
    let project = cfg
        .remove(key)
        .ok_or_else(|| OpsError::ProjectNotFound(key.to_string()))?;
    info!(project = %project.name, "project removed");
    Ok(project)
}

/// Set the status of `key`. A project known only from disk is registered
/// at its resolved path.
pub fn set_status(cfg: &mut Config, key: &str, status: Status) -> Result<Project, OpsError> {
    if let Some(project) = cfg.get_mut(key) {
        project.status = status;
        info!(project = %project.name, %status, "status changed");
        return Ok(project.clone());
    }
    let path = resolver::find_project_path(cfg, key)
        .ok_or_else(|| OpsError::ProjectNotFound(key.to_string()))?;
    let project = Project::new(key, path, status);
    cfg.insert(project.clone());
    info!(project = key, %status, "status set on discovered project");
    Ok(project)
}

/// Set the status of a listed row. Rows not yet in the config are registered
/// under their directory name.
pub fn set_status_at(
    cfg: &mut Config,
    name: &str,
    path: &Path,
    status: Status,
) -> Result<Project, OpsError> {
    if let Some(existing) = cfg.get(name) {
        if existing.path != path {
            return Err(OpsError::ProjectExists(name.to_string()));
        }
        return set_status(cfg, name, status);
    }
    let project = Project::new(name, path, status);
    cfg.insert(project.clone());
    info!(project = name, %status, "status set on discovered project");
    Ok(project)
}

/// Point `alias` at `key`. A project known only from disk is registered as
/// active first.
pub fn set_alias(cfg: &mut Config, key: &str, alias: &str) -> Result<Project, OpsError> {
    let alias = validate_name(alias)?;
    if !cfg.contains(key) {
        let path = resolver::find_project_path(cfg, key)
            .ok_or_else(|| OpsError::ProjectNotFound(key.to_string()))?;
        cfg.insert(Project::new(key, path, Status::Active));
    }
    let name = cfg
        .canonical_name(key)
        .map(str::to_string)
        .ok_or_else(|| OpsError::ProjectNotFound(key.to_string()))?;
    if !cfg.set_alias(&name, alias) {
        return Err(OpsError::ProjectExists(alias.to_string()));
    }
    let project = cfg
        .get(&name)
        .cloned()
        .ok_or_else(|| OpsError::ProjectNotFound(name.clone()))?;
    info!(project = %project.name, alias, "alias set");
    Ok(project)
}

/// Read-only view of a project for `status`. Unconfigured projects found on
/// disk are reported as active without being registered.
pub fn lookup(cfg: &Config, key: &str) -> Result<Project, OpsError> {
    if let Some(project) = cfg.get(key) {
        return Ok(project.clone());
    }
    resolver::find_project_path(cfg, key)
        .map(|path| Project::new(key, path, Status::Active))
        .ok_or_else(|| OpsError::ProjectNotFound(key.to_string()))
}
