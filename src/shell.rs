//! External process hand-offs: editors, the markdown pager, `git clone`,
//! and replacing the process with the user's shell.

use std::convert::Infallible;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::model::{PagerConfig, ShellConfig};

/// Editors offered by the tool picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalTool {
    Code,
    Cursor,
    Antigravity,
}

impl ExternalTool {
    pub const ALL: [ExternalTool; 3] = [
        ExternalTool::Code,
        ExternalTool::Cursor,
        ExternalTool::Antigravity,
    ];

    pub fn program(self) -> &'static str {
        match self {
            ExternalTool::Code => "code",
            ExternalTool::Cursor => "cursor",
            ExternalTool::Antigravity => "antigravity",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExternalTool::Code => "open with code",
            ExternalTool::Cursor => "open with cursor",
            ExternalTool::Antigravity => "open with antigravity",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CloneError {
    #[error("could not run git: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("git clone of {url} failed: {detail}")]
    Failed { url: String, detail: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("Failed to access directory: {}: {source}", path.display())]
    Chdir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to start shell {program}: {source}")]
    Exec {
        program: String,
        source: std::io::Error,
    },
}

/// Side effects that leave the process. Launcher and pager failures are
/// swallowed here (best effort); clone and shell failures are returned.
pub trait ShellBridge {
    /// Run `tool <path>` with inherited stdio and wait for it.
    fn launch_tool(&self, tool: ExternalTool, path: &Path);

    /// Show a markdown file in the pager with inherited stdio.
    fn open_pager(&self, file: &Path);

    /// Shallow-clone `url` into `dest`.
    fn clone_repository(&self, url: &str, dest: &Path) -> Result<(), CloneError>;

    /// Change into `dir` and replace the process with the login shell.
    /// Only returns on failure.
    fn exec_shell(&self, dir: &Path) -> Result<Infallible, ShellError>;
}

// ---------------------------------------------------------------------------
// Clone authentication
// ---------------------------------------------------------------------------

static SSH_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:ssh://|git\+ssh://|[A-Za-z0-9._-]+@[A-Za-z0-9._-]+:)")
        .expect("ssh url pattern is valid")
});

/// True for `ssh://host/repo` and scp-style `user@host:repo` remotes.
pub fn is_ssh_url(url: &str) -> bool {
    SSH_URL_RE.is_match(url.trim())
}

/// How a clone authenticates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneAuth {
    /// Use the running SSH agent at this socket
    SshAgent { socket: PathBuf },
    /// No credentials and no interactive prompts
    Anonymous,
}

/// SSH remotes use the agent when one is reachable; everything else, and SSH
/// without an agent, clones anonymously.
pub fn clone_auth(url: &str, agent_socket: Option<PathBuf>) -> CloneAuth {
    if !is_ssh_url(url) {
        return CloneAuth::Anonymous;
    }
    match agent_socket.filter(|s| !s.as_os_str().is_empty()) {
        Some(socket) => CloneAuth::SshAgent { socket },
        None => {
            warn!(url, "no ssh agent available, cloning without authentication");
            CloneAuth::Anonymous
        }
    }
}

/// Arguments for a shallow clone of `url` into `dest`.
pub fn clone_args(url: &str, dest: &Path) -> Vec<OsString> {
    vec![
        "clone".into(),
        "--depth".into(),
        "1".into(),
        url.into(),
        dest.as_os_str().to_os_string(),
    ]
}

/// Environment for the git child: `Some` sets a variable, `None` removes it.
///
/// Nothing may prompt while the TUI holds the terminal, so git's own
/// credential prompt is off and SSH remotes run ssh in batch mode whether or
/// not an agent is available.
pub fn clone_env(url: &str, auth: &CloneAuth) -> Vec<(&'static str, Option<OsString>)> {
    let mut env = vec![("GIT_TERMINAL_PROMPT", Some(OsString::from("0")))];
    if is_ssh_url(url) {
        env.push(("GIT_SSH_COMMAND", Some(OsString::from(SSH_BATCH_COMMAND))));
    }
    match auth {
        CloneAuth::SshAgent { socket } => {
            env.push(("SSH_AUTH_SOCK", Some(socket.as_os_str().to_os_string())))
        }
        CloneAuth::Anonymous => env.push(("SSH_AUTH_SOCK", None)),
    }
    env
}

const SSH_BATCH_COMMAND: &str = "ssh -o BatchMode=yes";

// ---------------------------------------------------------------------------
// System implementation
// ---------------------------------------------------------------------------

/// [`ShellBridge`] backed by real child processes.
#[derive(Debug, Clone)]
pub struct SystemShell {
    pager: PagerConfig,
    shell_program: String,
    git: PathBuf,
}

impl SystemShell {
    pub fn new(pager: PagerConfig, shell: &ShellConfig) -> Self {
        SystemShell {
            pager,
            shell_program: shell.resolve_program(),
            git: PathBuf::from("git"),
        }
    }

    fn run_inherited(mut cmd: Command) -> std::io::Result<std::process::ExitStatus> {
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
    }
}

impl ShellBridge for SystemShell {
    fn launch_tool(&self, tool: ExternalTool, path: &Path) {
        let mut cmd = Command::new(tool.program());
        cmd.arg(path);
        match Self::run_inherited(cmd) {
            Ok(status) if status.success() => debug!(tool = tool.program(), "tool exited"),
            Ok(status) => warn!(tool = tool.program(), %status, "tool exited with failure"),
            Err(e) => warn!(tool = tool.program(), error = %e, "could not launch tool"),
        }
    }

    fn open_pager(&self, file: &Path) {
        let mut cmd = Command::new(&self.pager.command);
        cmd.args(&self.pager.args).arg(file);
        if let Err(e) = Self::run_inherited(cmd) {
            warn!(pager = %self.pager.command, error = %e, "could not open pager");
        }
    }

    fn clone_repository(&self, url: &str, dest: &Path) -> Result<(), CloneError> {
        let agent = std::env::var_os("SSH_AUTH_SOCK").map(PathBuf::from);
        let mut cmd = Command::new(&self.git);
        cmd.args(clone_args(url, dest)).stdin(Stdio::null());
        for (key, value) in clone_env(url, &clone_auth(url, agent)) {
            match value {
                Some(value) => cmd.env(key, value),
                None => cmd.env_remove(key),
            };
        }

        info!(url, dest = %dest.display(), "cloning repository");
        let output = cmd.output().map_err(CloneError::Spawn)?;
        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let detail = if stderr.is_empty() {
            format!("exit status {}", output.status)
        } else {
            stderr
        };
        Err(CloneError::Failed {
            url: url.to_string(),
            detail,
        })
    }

    fn exec_shell(&self, dir: &Path) -> Result<Infallible, ShellError> {
        std::env::set_current_dir(dir).map_err(|source| ShellError::Chdir {
            path: dir.to_path_buf(),
            source,
        })?;
        info!(dir = %dir.display(), shell = %self.shell_program, "handing off to shell");
        let exec_err = |source| ShellError::Exec {
            program: self.shell_program.clone(),
            source,
        };

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // exec only returns if the image could not be replaced
            let err = Command::new(&self.shell_program).exec();
            Err(exec_err(err))
        }

        #[cfg(not(unix))]
        {
            // No exec(): run the shell as a child and exit with its status
            let status = Command::new(&self.shell_program)
                .status()
                .map_err(exec_err)?;
            std::process::exit(status.code().unwrap_or(0));
        }
    }
}
