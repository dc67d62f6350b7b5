use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::project::Project;

/// The persisted aggregate: workspaces plus projects.
///
/// In memory every project is stored once under its canonical name, and each
/// alias maps to that name, so edits made through either key touch the same
/// record. On disk the alias is written as a second key holding a copy of the
/// record (see [`ConfigFile`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ConfigFile", into = "ConfigFile")]
pub struct Config {
    workspaces: Vec<PathBuf>,
    projects: IndexMap<String, Project>,
    aliases: IndexMap<String, String>,
}

impl Config {
    // -----------------------------------------------------------------------
    // Workspaces
    // -----------------------------------------------------------------------

    pub fn workspaces(&self) -> &[PathBuf] {
        &self.workspaces
    }

    /// Append a workspace unless the same path is already present.
    /// Returns true if it was added.
    pub fn add_workspace(&mut self, path: &Path) -> bool {
        if self.workspaces.iter().any(|w| w == path) {
            return false;
        }
        self.workspaces.push(path.to_path_buf());
        true
    }

    pub fn remove_workspace(&mut self, path: &Path) -> bool {
        let before = self.workspaces.len();
        self.workspaces.retain(|w| w != path);
        self.workspaces.len() != before
    }

    pub fn has_workspace(&self, path: &Path) -> bool {
        self.workspaces.iter().any(|w| w == path)
    }

    /// Keep only the workspaces for which `keep` returns true; returns the dropped ones.
    pub fn retain_workspaces(&mut self, mut keep: impl FnMut(&Path) -> bool) -> Vec<PathBuf> {
        let (kept, dropped): (Vec<_>, Vec<_>) =
            self.workspaces.drain(..).partition(|w| keep(w.as_path()));
        self.workspaces = kept;
        dropped
    }

    // -----------------------------------------------------------------------
    // Projects
    // -----------------------------------------------------------------------

    /// Canonical project records, in insertion order. Aliases are not repeated.
    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.values()
    }

    pub fn project_count(&self) -> usize {
        self.projects.len()
    }

    /// Map a name or alias to the canonical project name.
    pub fn canonical_name<'a>(&'a self, key: &'a str) -> Option<&'a str> {
        if let Some((name, _)) = self.projects.get_key_value(key) {
            return Some(name.as_str());
        }
        self.aliases.get(key).map(|s| s.as_str())
    }

    /// Look up a project by name or alias.
    pub fn get(&self, key: &str) -> Option<&Project> {
        let name = self.canonical_name(key)?;
        self.projects.get(name)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Project> {
        let name = self.canonical_name(key)?.to_string();
        self.projects.get_mut(&name)
    }

    /// True if `key` is a project name or an alias.
    pub fn contains(&self, key: &str) -> bool {
        self.canonical_name(key).is_some()
    }

    /// Insert or replace a project under its name.
    pub fn insert(&mut self, project: Project) {
        self.aliases.shift_remove(&project.name);
        self.projects.insert(project.name.clone(), project);
    }

    /// Remove a project (by name or alias) together with all of its aliases.
    pub fn remove(&mut self, key: &str) -> Option<Project> {
        let name = self.canonical_name(key)?.to_string();
        self.aliases.retain(|_, target| *target != name);
        self.projects.shift_remove(&name)
    }

    /// Point `alias` at the project named by `key`. The alias must not be the
    /// name of another project. Returns false if `key` is unknown or the
    /// alias would shadow another project.
    ///
    /// A project carries one alias: its previous alias key is dropped, and a
    /// project that previously owned `alias` loses it.
    pub fn set_alias(&mut self, key: &str, alias: &str) -> bool {
        let Some(name) = self.canonical_name(key).map(|s| s.to_string()) else {
            return false;
        };
        if alias != name && self.projects.contains_key(alias) {
            return false;
        }

        let owner = self.aliases.get(alias).filter(|o| **o != name).cloned();
        if let Some(previous) = owner.and_then(|o| self.projects.get_mut(&o)) {
            if previous.alias.as_deref() == Some(alias) {
                previous.alias = None;
            }
        }
        self.aliases
            .retain(|a, target| !(*target == name && a != alias));

        if let Some(project) = self.projects.get_mut(&name) {
            project.alias = Some(alias.to_string());
        }
        if alias != name {
            self.aliases.insert(alias.to_string(), name);
        }
        true
    }

    /// All aliases that resolve to the project named `name`.
    pub fn aliases_of(&self, name: &str) -> Vec<&str> {
        self.aliases
            .iter()
            .filter(|(_, target)| target.as_str() == name)
            .map(|(alias, _)| alias.as_str())
            .collect()
    }

    /// Remove every project whose path lies under `root` (component-wise).
    pub fn remove_projects_under(&mut self, root: &Path) -> Vec<Project> {
        let names: Vec<String> = self
            .projects
            .values()
            .filter(|p| p.path.starts_with(root))
            .map(|p| p.name.clone())
            .collect();
        names.iter().filter_map(|n| self.remove(n)).collect()
    }
}

/// On-disk shape of the config file:
/// `{ "workspaces": [..], "projects": { <name-or-alias>: Project } }`.
///
/// Both fields tolerate `null`, which older writers emitted for empty lists.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub workspaces: Option<Vec<PathBuf>>,
    #[serde(default)]
    pub projects: Option<IndexMap<String, Project>>,
}

impl From<ConfigFile> for Config {
    fn from(file: ConfigFile) -> Self {
        let mut config = Config::default();
        for w in file.workspaces.unwrap_or_default() {
            config.add_workspace(&w);
        }

        let entries = file.projects.unwrap_or_default();

        // Canonical records first: entries keyed by their own name
        for (key, project) in &entries {
            if *key == project.name {
                config.projects.insert(key.clone(), project.clone());
            }
        }

        // Remaining keys are aliases. An alias whose canonical record is
        // missing promotes its copy to canonical.
        for (key, project) in entries {
            if key == project.name {
                continue;
            }
            if !config.projects.contains_key(&project.name) {
                config.projects.insert(project.name.clone(), project.clone());
            }
            if !config.projects.contains_key(&key) {
                config.aliases.insert(key, project.name);
            }
        }

        config
    }
}

impl From<Config> for ConfigFile {
    fn from(config: Config) -> Self {
        let mut projects = IndexMap::new();
        for (name, project) in &config.projects {
            projects.insert(name.clone(), project.clone());
        }
        for (alias, name) in &config.aliases {
            if let Some(project) = config.projects.get(name) {
                projects.insert(alias.clone(), project.clone());
            }
        }
        ConfigFile {
            workspaces: Some(config.workspaces),
            projects: Some(projects),
        }
    }
}
