use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "orbit", about = concat!("\u{25C9} orbit v", env!("CARGO_PKG_VERSION"), " - keep your side projects in orbit"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register a workspace directory, optionally creating a project in it
    Init(InitArgs),
    /// Give a project a second name
    Alias(AliasArgs),
    /// Change a project's status
    Set(SetArgs),
    /// Show a project's name, alias, status and path
    Status(ProjectArg),
    /// Open a project's README in the pager
    Info(ProjectArg),
    /// Open the interactive menu
    Ls,
}

#[derive(Args)]
pub struct InitArgs {
    /// Workspace directory (default: current directory)
    #[arg(default_value = ".")]
    pub path: String,
    /// Create a project with this name inside the workspace
    #[arg(short, long)]
    pub project: Option<String>,
}

#[derive(Args)]
pub struct AliasArgs {
    /// Project name or existing alias
    pub project: String,
    /// New alias
    pub alias: String,
}

#[derive(Args)]
pub struct SetArgs {
    /// Project name or alias
    pub project: String,
    /// New status: active, archived, done or "not set"
    #[arg(num_args = 1.., required = true)]
    pub status: Vec<String>,
}

impl SetArgs {
    /// `orbit set demo not set` arrives as two words
    pub fn status_text(&self) -> String {
        self.status.join(" ")
    }
}

#[derive(Args)]
pub struct ProjectArg {
    /// Project name or alias
    pub project: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_args_means_tui() {
        let cli = Cli::try_parse_from(["orbit"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn init_defaults_to_current_dir() {
        let cli = Cli::try_parse_from(["orbit", "init"]).unwrap();
        match cli.command {
            Some(Commands::Init(args)) => {
                assert_eq!(args.path, ".");
                assert!(args.project.is_none());
            }
            _ => panic!("expected init"),
        }

        let cli = Cli::try_parse_from(["orbit", "init", "/tmp/ws", "-p", "demo"]).unwrap();
        match cli.command {
            Some(Commands::Init(args)) => {
                assert_eq!(args.path, "/tmp/ws");
                assert_eq!(args.project.as_deref(), Some("demo"));
            }
            _ => panic!("expected init"),
        }
    }

    #[test]
    fn set_accepts_two_word_status() {
        let cli = Cli::try_parse_from(["orbit", "set", "demo", "not", "set"]).unwrap();
        match cli.command {
            Some(Commands::Set(args)) => assert_eq!(args.status_text(), "not set"),
            _ => panic!("expected set"),
        }
        let cli = Cli::try_parse_from(["orbit", "set", "demo", "not set"]).unwrap();
        match cli.command {
            Some(Commands::Set(args)) => assert_eq!(args.status_text(), "not set"),
            _ => panic!("expected set"),
        }
    }

    #[test]
    fn alias_requires_both_names() {
        assert!(Cli::try_parse_from(["orbit", "alias", "demo"]).is_err());
        assert!(Cli::try_parse_from(["orbit", "alias", "demo", "d"]).is_ok());
    }
}
