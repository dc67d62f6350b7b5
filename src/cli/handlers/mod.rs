mod init;
pub use init::cmd_init;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_store::ConfigStore;
use crate::io::settings_io::read_settings;
use crate::model::Status;
use crate::ops::OpsError;
use crate::ops::{project_ops, resolver};
use crate::shell::{ShellBridge, SystemShell};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;

    match cli.command {
        // No subcommand → launch TUI
        None | Some(Commands::Ls) => crate::tui::run(),
        Some(Commands::Init(args)) => cmd_init(args),
        Some(Commands::Alias(args)) => cmd_alias(args),
        Some(Commands::Set(args)) => cmd_set(args),
        Some(Commands::Status(args)) => cmd_status(args, json),
        Some(Commands::Info(args)) => cmd_info(args),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_alias(args: AliasArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = ConfigStore::at_default_location();
    let mut cfg = store.load();
    project_ops::set_alias(&mut cfg, &args.project, &args.alias)?;
    store.save(&cfg)?;
    println!(
        "{}",
        success(&format!(
            "Alias '{}' set for project '{}'",
            args.alias, args.project
        ))
    );
    Ok(())
}

fn cmd_set(args: SetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let text = args.status_text();
    let status: Status = text
        .parse()
        .map_err(|_| OpsError::InvalidStatus(text.clone()))?;

    let store = ConfigStore::at_default_location();
    let mut cfg = store.load();
    project_ops::set_status(&mut cfg, &args.project, status)?;
    store.save(&cfg)?;
    println!(
        "{}",
        success(&format!(
            "Project '{}' status set to {}",
            args.project, status
        ))
    );
    Ok(())
}

fn cmd_status(args: ProjectArg, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = ConfigStore::at_default_location().load();
    let project = project_ops::lookup(&cfg, &args.project)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&ProjectJson::from(&project))?);
    } else {
        print!("{}", format_project_status(&project));
    }
    Ok(())
}

fn cmd_info(args: ProjectArg) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = ConfigStore::at_default_location().load();
    let path = resolver::find_project_path(&cfg, &args.project)
        .ok_or_else(|| OpsError::ProjectNotFound(args.project.clone()))?;
    let readme = resolver::find_readme(&path)
        .ok_or_else(|| format!("README.md not found in {}", path.display()))?;

    let settings = read_settings();
    SystemShell::new(settings.pager, &settings.shell).open_pager(&readme);
    Ok(())
}
