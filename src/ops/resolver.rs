use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::{Config, Project, Status};

/// Directory inside a workspace that holds one subdirectory per project.
pub const PROJECT_DIR: &str = "project";
/// Subdirectories of a project root.
pub const REPO_DIR: &str = "repo";
pub const DOCS_DIR: &str = "docs";
pub const SECRET_DIR: &str = "secret";

const README_ALTERNATES: [&str; 3] = ["readme.md", "Readme.md", "README.MD"];

/// One row of the dashboard: a project or the placeholder for a workspace
/// that has none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardRow {
    Project { workspace: PathBuf, project: Project },
    Empty { workspace: PathBuf },
}

impl DashboardRow {
    pub fn workspace(&self) -> &Path {
        match self {
            DashboardRow::Project { workspace, .. } | DashboardRow::Empty { workspace } => {
                workspace
            }
        }
    }
}

/// Resolve a project name or alias to its root directory.
///
/// Configured projects win. Otherwise each workspace is probed for
/// `<ws>/project/repo/<key>`, which maps to `<ws>/project/<key>`.
pub fn find_project_path(cfg: &Config, key: &str) -> Option<PathBuf> {
    if let Some(project) = cfg.get(key) {
        return Some(project.path.clone());
    }
    cfg.workspaces().iter().find_map(|ws| {
        let probe = ws.join(PROJECT_DIR).join(REPO_DIR).join(key);
        probe
            .is_dir()
            .then(|| ws.join(PROJECT_DIR).join(key))
    })
}

/// Subdirectories found on disk for a workspace, sorted by name.
///
/// The `project/` container is expanded into its children; any other
/// directory directly under the workspace is listed as-is.
pub fn discover_dirs(workspace: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for dir in sorted_subdirs(workspace) {
        if dir.file_name().is_some_and(|n| n == PROJECT_DIR) {
            found.extend(sorted_subdirs(&dir));
        } else {
            found.push(dir);
        }
    }
    found
}

fn sorted_subdirs(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
        .map(|e| e.path())
        .collect();
    dirs.sort();
    dirs
}

/// Project synthesized for a directory with no config entry. A configured
/// project with the same name lends its status.
fn discovered(cfg: &Config, path: PathBuf) -> Project {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let status = cfg.get(&name).map(|p| p.status).unwrap_or(Status::NotSet);
    Project::new(name, path, status)
}

/// True if `path` lies strictly under `workspace` and no registered workspace
/// nested inside `workspace` also contains it. Each path belongs to the
/// deepest workspace above it.
fn belongs_to(cfg: &Config, workspace: &Path, path: &Path) -> bool {
    let under = |root: &Path| path != root && path.starts_with(root);
    under(workspace)
        && !cfg
            .workspaces()
            .iter()
            .any(|w| w != workspace && w.starts_with(workspace) && under(w))
}

/// Configured projects under `workspace`, then unconfigured directories on
/// disk. No two rows share a path; configured rows win.
pub fn projects_in_workspace(cfg: &Config, workspace: &Path) -> Vec<Project> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    collect_workspace(cfg, workspace, &mut seen)
}

fn collect_workspace(cfg: &Config, workspace: &Path, seen: &mut HashSet<PathBuf>) -> Vec<Project> {
    let mut rows = Vec::new();
    for project in cfg.projects() {
        if belongs_to(cfg, workspace, &project.path) && seen.insert(project.path.clone()) {
            rows.push(project.clone());
        }
    }
    for dir in discover_dirs(workspace) {
        if belongs_to(cfg, workspace, &dir) && seen.insert(dir.clone()) {
            rows.push(discovered(cfg, dir));
        }
    }
    rows
}

/// Projects grouped by workspace in configured order, sharing one set of
/// seen paths so nested workspaces never repeat a row.
fn grouped_by_workspace(cfg: &Config, seen: &mut HashSet<PathBuf>) -> Vec<(PathBuf, Vec<Project>)> {
    cfg.workspaces()
        .iter()
        .map(|ws| (ws.clone(), collect_workspace(cfg, ws, seen)))
        .collect()
}

/// Every project across all workspaces, plus configured projects that live
/// outside any workspace. One row per distinct path.
pub fn list_all_projects(cfg: &Config) -> Vec<Project> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut rows: Vec<Project> = grouped_by_workspace(cfg, &mut seen)
        .into_iter()
        .flat_map(|(_, projects)| projects)
        .collect();
    for project in cfg.projects() {
        if seen.insert(project.path.clone()) {
            rows.push(project.clone());
        }
    }
    rows
}

/// Rows for the dashboard, grouped by workspace in configured order. A
/// workspace without projects contributes a single [`DashboardRow::Empty`].
pub fn dashboard_rows(cfg: &Config) -> Vec<DashboardRow> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut rows = Vec::new();
    for (workspace, projects) in grouped_by_workspace(cfg, &mut seen) {
        if projects.is_empty() {
            rows.push(DashboardRow::Empty { workspace });
            continue;
        }
        rows.extend(projects.into_iter().map(|project| DashboardRow::Project {
            workspace: workspace.clone(),
            project,
        }));
    }
    rows
}

/// True if `project` is backed by a config entry at the same path.
pub fn is_configured(cfg: &Config, project: &Project) -> bool {
    cfg.get(&project.name)
        .is_some_and(|p| p.path == project.path)
}

/// Locate the README for a project root.
///
/// Order: `repo/README.md`, `README.md`, then each of `readme.md`,
/// `Readme.md`, `README.MD` under `repo/` and then the root.
pub fn find_readme(project_path: &Path) -> Option<PathBuf> {
    let repo = project_path.join(REPO_DIR);
    let mut candidates = vec![repo.join("README.md"), project_path.join("README.md")];
    for alt in README_ALTERNATES {
        candidates.push(repo.join(alt));
        candidates.push(project_path.join(alt));
    }
    candidates.into_iter().find(|c| c.is_file())
}
