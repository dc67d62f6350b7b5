use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// User settings from `settings.toml`. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub pager: PagerConfig,
    #[serde(default)]
    pub shell: ShellConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Hex color overrides keyed by theme slot (e.g. `highlight = "#7C3AED"`)
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

/// Markdown viewer used for README files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagerConfig {
    #[serde(default = "default_pager_command")]
    pub command: String,
    #[serde(default = "default_pager_args")]
    pub args: Vec<String>,
}

impl Default for PagerConfig {
    fn default() -> Self {
        PagerConfig {
            command: default_pager_command(),
            args: default_pager_args(),
        }
    }
}

fn default_pager_command() -> String {
    "glow".to_string()
}

fn default_pager_args() -> Vec<String> {
    vec!["-p".to_string()]
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Shell started by "goto"; falls back to `$SHELL`, then `/bin/bash`
    #[serde(default)]
    pub program: Option<String>,
}

impl ShellConfig {
    pub fn resolve_program(&self) -> String {
        self.program
            .clone()
            .filter(|p| !p.is_empty())
            .or_else(|| std::env::var("SHELL").ok().filter(|s| !s.is_empty()))
            .unwrap_or_else(|| "/bin/bash".to_string())
    }
}
