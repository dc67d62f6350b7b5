use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `debug`, `orbit=trace`)
pub const ENV_LOG: &str = "ORBIT_LOG";

pub fn log_file_path(dir: &Path) -> PathBuf {
    dir.join("orbit.log")
}

/// Send `tracing` output to `<dir>/orbit.log`. The terminal belongs to the
/// TUI, so nothing is ever logged to stdout or stderr.
pub fn init(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path(dir))?;

    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(log_file))
        .try_init()
        .map_err(std::io::Error::other)
}
