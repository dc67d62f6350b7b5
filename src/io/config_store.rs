use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::model::Config;

/// Environment variable overriding the full path of the state file
pub const ENV_CONFIG_PATH: &str = "ORBIT_CONFIG";

const STATE_FILE: &str = "orbit.json";

/// Error type for persisting the config
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Per-user directory holding state, settings and logs.
/// Respects `XDG_CONFIG_HOME`, falling back to `~/.config/orbit`.
pub fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| dirs_home().join(".config"));
    base.join("orbit")
}

/// Get the user's home directory
pub fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Reads and writes the whole [`Config`] as one JSON document.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ConfigStore { path: path.into() }
    }

    /// Store at `$ORBIT_CONFIG`, or `<config dir>/orbit.json`.
    pub fn at_default_location() -> Self {
        let path = std::env::var(ENV_CONFIG_PATH)
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| config_dir().join(STATE_FILE));
        ConfigStore::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the config. Never fails: a missing or unreadable file yields an
    /// empty config, and a corrupt one is backed up as `.bak` first.
    pub fn load(&self) -> Config {
        if !self.path.exists() {
            return Config::default();
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read config");
                return Config::default();
            }
        };

        match serde_json::from_str::<Config>(&content) {
            Ok(cfg) => cfg,
            Err(e) => {
                let bak = self.path.with_extension("json.bak");
                let _ = fs::copy(&self.path, &bak);
                warn!(
                    path = %self.path.display(),
                    backup = %bak.display(),
                    error = %e,
                    "could not parse config, starting empty"
                );
                Config::default()
            }
        }
    }

    /// Replace the stored config with `cfg`, creating the directory if needed.
    pub fn save(&self, cfg: &Config) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let mut content = serde_json::to_string_pretty(cfg)?;
        content.push('\n');
        atomic_write(&self.path, content.as_bytes()).map_err(io_err)?;
        debug!(path = %self.path.display(), "config saved");
        Ok(())
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Project, Status};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, ConfigStore) {
        let tmp = TempDir::new().unwrap();
        let store = ConfigStore::new(tmp.path().join("orbit").join("orbit.json"));
        (tmp, store)
    }

    #[test]
    fn missing_file_loads_empty() {
        let (_tmp, store) = temp_store();
        let cfg = store.load();
        assert!(cfg.workspaces().is_empty());
        assert_eq!(cfg.project_count(), 0);
    }

    #[test]
    fn save_creates_directory_lazily() {
        let (_tmp, store) = temp_store();
        assert!(!store.path().parent().unwrap().exists());
        store.save(&Config::default()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn save_then_load_is_identity() {
        let (_tmp, store) = temp_store();
        let mut cfg = Config::default();
        cfg.add_workspace(Path::new("/tmp/ws1"));
        cfg.insert(Project::new("demo", "/tmp/ws1/project/demo", Status::Active));
        cfg.set_alias("demo", "d");

        store.save(&cfg).unwrap();
        let first = store.load();
        store.save(&first).unwrap();
        let second = store.load();
        assert_eq!(first, cfg);
        assert_eq!(second, cfg);
    }

    #[test]
    fn save_overwrites_previous_state() {
        let (_tmp, store) = temp_store();
        let mut cfg = Config::default();
        cfg.add_workspace(Path::new("/a"));
        cfg.add_workspace(Path::new("/b"));
        store.save(&cfg).unwrap();

        store.save(&Config::default()).unwrap();
        assert!(store.load().workspaces().is_empty());
    }

    #[test]
    fn saved_file_is_pretty_json() {
        let (_tmp, store) = temp_store();
        let mut cfg = Config::default();
        cfg.add_workspace(Path::new("/tmp/ws1"));
        store.save(&cfg).unwrap();
        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\n  \"workspaces\": [\n    \"/tmp/ws1\"\n  ]"));
        assert!(text.contains("\"projects\": {}"));
    }

    #[test]
    fn corrupt_file_is_backed_up() {
        let (_tmp, store) = temp_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{ not json").unwrap();
        let cfg = store.load();
        assert!(cfg.workspaces().is_empty());
        assert!(store.path().with_extension("json.bak").exists());
    }

    #[test]
    fn save_reports_unwritable_location() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        fs::write(&blocker, "x").unwrap();
        let store = ConfigStore::new(blocker.join("orbit.json"));
        assert!(matches!(
            store.save(&Config::default()),
            Err(ConfigError::Io { .. })
        ));
    }
}
