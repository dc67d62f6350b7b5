use crate::cli::commands::InitArgs;
use crate::cli::output::success;
use crate::io::config_store::{ConfigStore, dirs_home};
use crate::ops::{project_ops, workspace_ops};

/// `orbit init [path] [--project name]`: create and register the workspace,
/// and with `--project` lay out and register a project inside it.
pub fn cmd_init(args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let workspace = workspace_ops::resolve_workspace_input(&args.path, &cwd, &dirs_home());

    let store = ConfigStore::at_default_location();
    let mut cfg = store.load();
    workspace_ops::create_workspace(&mut cfg, &workspace)?;

    let message = match args.project {
        Some(name) => {
            let project = project_ops::init_project(&mut cfg, &workspace, &name)?;
            format!(
                "Project '{}' created at {}",
                project.name,
                project.path.display()
            )
        }
        None => format!("Workspace initialized at {}", workspace.display()),
    };

    store.save(&cfg)?;
    println!("{}", success(&message));
    Ok(())
}
