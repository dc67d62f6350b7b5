use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::info;

use crate::model::{Config, Project};
use crate::ops::OpsError;

/// Path used when the create prompt is left empty.
pub const DEFAULT_WORKSPACE: &str = "~/workspace/orbit_ws1";

/// Display name of a workspace: its last path segment.
pub fn display_name(workspace: &Path) -> String {
    workspace
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| workspace.display().to_string())
}

/// Drop workspaces whose directory no longer exists. Projects are left alone.
pub fn prune_missing(cfg: &mut Config) -> Vec<PathBuf> {
    let dropped = cfg.retain_workspaces(|w| w.exists());
    for w in &dropped {
        info!(workspace = %w.display(), "pruned missing workspace");
    }
    dropped
}

/// Turn prompt input into an absolute workspace path: empty input means the
/// default, a leading `~` is the home directory, relative paths are taken
/// from `cwd`. `.` and `..` are resolved lexically.
pub fn resolve_workspace_input(input: &str, cwd: &Path, home: &Path) -> PathBuf {
    let input = input.trim();
    let input = if input.is_empty() {
        DEFAULT_WORKSPACE
    } else {
        input
    };

    let raw = match input.strip_prefix('~') {
        Some(rest) => home.join(rest.trim_start_matches('/')),
        None => PathBuf::from(input),
    };
    absolutize(&raw, cwd)
}

/// Join `path` onto `base` when relative and normalize `.`/`..` lexically.
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    let mut out = PathBuf::new();
    for comp in joined.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Create the workspace directory and register it. Re-adding a registered
/// path is a no-op; a different path with the same display name is refused.
pub fn create_workspace(cfg: &mut Config, path: &Path) -> Result<bool, OpsError> {
    let name = display_name(path);
    if cfg
        .workspaces()
        .iter()
        .any(|w| w != path && display_name(w) == name)
    {
        return Err(OpsError::WorkspaceNameTaken(name));
    }
    fs::create_dir_all(path).map_err(OpsError::io(path))?;
    let added = cfg.add_workspace(path);
    if added {
        info!(workspace = %path.display(), "workspace created");
    }
    Ok(added)
}

/// Unregister a workspace and every project under it.
pub fn remove_workspace(cfg: &mut Config, path: &Path) -> Result<Vec<Project>, OpsError> {
    if !cfg.remove_workspace(path) {
        return Err(OpsError::WorkspaceNotFound(path.to_path_buf()));
    }
    let removed = cfg.remove_projects_under(path);
    info!(
        workspace = %path.display(),
        projects = removed.len(),
        "workspace removed"
    );
    Ok(removed)
}

/// Delete a directory tree from disk. A missing directory is not an error.
pub fn purge_dir(path: &Path) -> Result<(), OpsError> {
    match fs::remove_dir_all(path) {
        Ok(()) => {
            info!(path = %path.display(), "deleted from disk");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(OpsError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn empty_input_uses_default_under_home() {
        let p = resolve_workspace_input("", Path::new("/cwd"), Path::new("/home/me"));
        assert_eq!(p, PathBuf::from("/home/me/workspace/orbit_ws1"));
    }

    #[test]
    fn tilde_and_relative_inputs_become_absolute() {
        let home = Path::new("/home/me");
        let cwd = Path::new("/srv/code");
        assert_eq!(
            resolve_workspace_input("~/ws", cwd, home),
            PathBuf::from("/home/me/ws")
        );
        assert_eq!(
            resolve_workspace_input("ws2", cwd, home),
            PathBuf::from("/srv/code/ws2")
        );
        assert_eq!(
            resolve_workspace_input("../other/./ws3", cwd, home),
            PathBuf::from("/srv/other/ws3")
        );
    }

    #[test]
    fn display_name_is_last_segment() {
        assert_eq!(display_name(Path::new("/tmp/ws1")), "ws1");
    }

    #[test]
    fn create_registers_once() {
        let tmp = TempDir::new().unwrap();
        let ws = tmp.path().join("ws1");
        let mut cfg = Config::default();
        assert!(create_workspace(&mut cfg, &ws).unwrap());
        assert!(!create_workspace(&mut cfg, &ws).unwrap());
        assert!(ws.is_dir());
        assert_eq!(cfg.workspaces(), &[ws]);
    }

    #[test]
    fn create_refuses_duplicate_display_name() {
        let tmp = TempDir::new().unwrap();
        let mut cfg = Config::default();
        create_workspace(&mut cfg, &tmp.path().join("a").join("ws")).unwrap();
        let err = create_workspace(&mut cfg, &tmp.path().join("b").join("ws")).unwrap_err();
        assert!(matches!(err, OpsError::WorkspaceNameTaken(name) if name == "ws"));
        assert_eq!(cfg.workspaces().len(), 1);
    }

    #[test]
    fn remove_cascades_only_to_contained_projects() {
        let mut cfg = Config::default();
        cfg.add_workspace(Path::new("/tmp/ws1"));
        cfg.add_workspace(Path::new("/tmp/ws2"));
        cfg.insert(Project::new("a", "/tmp/ws1/project/a", Status::Active));
        cfg.insert(Project::new("b", "/tmp/ws2/project/b", Status::Done));
        cfg.set_alias("a", "aa");

        let removed = remove_workspace(&mut cfg, Path::new("/tmp/ws1")).unwrap();
        assert_eq!(removed.len(), 1);
        assert!(!cfg.contains("a"));
        assert!(!cfg.contains("aa"));
        assert_eq!(cfg.get("b").unwrap().status, Status::Done);
        assert_eq!(cfg.workspaces(), &[PathBuf::from("/tmp/ws2")]);
    }

    #[test]
    fn remove_unknown_workspace_errors() {
        let mut cfg = Config::default();
        assert!(matches!(
            remove_workspace(&mut cfg, Path::new("/nope")),
            Err(OpsError::WorkspaceNotFound(_))
        ));
    }

    #[test]
    fn prune_drops_missing_and_keeps_projects() {
        let tmp = TempDir::new().unwrap();
        let live = tmp.path().join("live");
        fs::create_dir_all(&live).unwrap();
        let mut cfg = Config::default();
        cfg.add_workspace(&live);
        cfg.add_workspace(&tmp.path().join("gone"));
        cfg.insert(Project::new("p", live.join("project").join("p"), Status::Active));

        let dropped = prune_missing(&mut cfg);
        assert_eq!(dropped, vec![tmp.path().join("gone")]);
        assert_eq!(cfg.workspaces(), &[live]);
        assert!(cfg.contains("p"));
    }

    #[test]
    fn purge_tolerates_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("ws");
        fs::create_dir_all(dir.join("project").join("x")).unwrap();
        purge_dir(&dir).unwrap();
        assert!(!dir.exists());
        purge_dir(&dir).unwrap();
    }
}
