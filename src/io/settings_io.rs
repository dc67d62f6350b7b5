use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::config_store::config_dir;
use crate::model::Settings;

/// Environment variable overriding the settings file path
pub const ENV_SETTINGS_PATH: &str = "ORBIT_SETTINGS";

/// `$ORBIT_SETTINGS`, or `<config dir>/settings.toml`.
pub fn settings_path() -> PathBuf {
    std::env::var(ENV_SETTINGS_PATH)
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| config_dir().join("settings.toml"))
}

/// Read settings from a specific path. Missing or malformed files yield defaults.
pub fn read_settings_from(path: &Path) -> Settings {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return Settings::default(),
    };
    match toml::from_str(&content) {
        Ok(s) => s,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not parse settings, using defaults");
            Settings::default()
        }
    }
}

pub fn read_settings() -> Settings {
    read_settings_from(&settings_path())
}
