use std::io;
use std::path::PathBuf;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, error};

use crate::io::config_store::{ConfigStore, dirs_home};
use crate::io::settings_io::read_settings;
use crate::model::Config;
use crate::ops::OpsError;
use crate::ops::project_ops::{self, ProjectSource};
use crate::ops::resolver::{self, DashboardRow};
use crate::ops::workspace_ops;
use crate::shell::{ShellBridge, SystemShell};

use super::input;
use super::nav::{Confirm, Effect, Input, MessageKind, Nav, Row, Screen};
use super::render;
use super::theme::Theme;

/// Main application state: the loaded config, the menu state machine and
/// the rows currently on screen.
pub struct App {
    pub config: Config,
    store: ConfigStore,
    shell: Box<dyn ShellBridge>,
    pub nav: Nav,
    pub theme: Theme,
    pub rows: Vec<Row>,
    cwd: PathBuf,
    home: PathBuf,
}

impl App {
    /// Load the config, drop workspaces that vanished from disk and persist
    /// the result before the first frame.
    pub fn new(store: ConfigStore, shell: Box<dyn ShellBridge>, theme: Theme) -> Self {
        let mut config = store.load();
        workspace_ops::prune_missing(&mut config);

        let mut nav = Nav::new();
        if let Err(e) = store.save(&config) {
            error!(error = %e, "could not save config at startup");
            nav.notify(MessageKind::Error, format!("Failed to save config: {}", e));
        }

        let mut app = App {
            config,
            store,
            shell,
            nav,
            theme,
            rows: Vec::new(),
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/")),
            home: dirs_home(),
        };
        app.refresh_rows();
        app
    }

    /// Rebuild the visible rows for the current screen and clamp the cursor.
    pub fn refresh_rows(&mut self) {
        self.rows = build_rows(&self.config, self.nav.screen());
        self.nav.clamp(self.rows.len());
    }

    /// Feed one input to the state machine. The returned effects have not
    /// been applied yet.
    pub fn handle_input(&mut self, input: Input) -> Vec<Effect> {
        let effects = self.nav.handle(input, &self.rows);
        self.refresh_rows();
        effects
    }

    /// Handle an input and apply its effects immediately.
    pub fn dispatch(&mut self, input: Input) {
        for effect in self.handle_input(input) {
            self.apply(effect);
        }
        self.refresh_rows();
    }

    /// Perform one effect, reporting the outcome through the message line.
    pub fn apply(&mut self, effect: Effect) {
        debug!(?effect, "applying effect");
        match effect {
            Effect::CreateWorkspace { input } => {
                let path = workspace_ops::resolve_workspace_input(&input, &self.cwd, &self.home);
                match mutate(&mut self.config, &self.store, |cfg| {
                    workspace_ops::create_workspace(cfg, &path)
                }) {
                    Ok(_) => {
                        self.nav.notify(
                            MessageKind::Success,
                            format!("Workspace created at {}", path.display()),
                        );
                        self.nav
                            .confirm(Confirm::AddProjectToNewWorkspace { workspace: path });
                    }
                    Err(e) => self.nav.fail(e.to_string()),
                }
            }

            Effect::CheckNewProject { workspace, name } => {
                match project_ops::check_new_project(&self.config, &workspace, &name) {
                    Ok(_) => self
                        .nav
                        .confirm(Confirm::CloneRepository { workspace, name }),
                    Err(e) => self.nav.fail(e.to_string()),
                }
            }

            Effect::AddProject {
                workspace,
                name,
                clone_url,
            } => {
                let cloned = clone_url.is_some();
                let source = clone_url.map_or(ProjectSource::Empty, ProjectSource::Clone);
                let shell = self.shell.as_ref();
                match mutate(&mut self.config, &self.store, |cfg| {
                    project_ops::add_project(cfg, &workspace, &name, &source, shell)
                }) {
                    Ok(project) if cloned => self.nav.notify(
                        MessageKind::Success,
                        format!("Project '{}' created with cloned repo", project.name),
                    ),
                    Ok(project) => self.nav.notify(
                        MessageKind::Success,
                        format!(
                            "Project '{}' created at {}",
                            project.name,
                            project.path.display()
                        ),
                    ),
                    Err(e) => self.nav.fail(e.to_string()),
                }
            }

            Effect::RemoveWorkspace { path } => {
                if let Err(e) = mutate(&mut self.config, &self.store, |cfg| {
                    workspace_ops::remove_workspace(cfg, &path)
                }) {
                    self.nav.fail(e.to_string());
                }
            }

            Effect::RemoveProject { name } => {
                if let Err(e) = mutate(&mut self.config, &self.store, |cfg| {
                    project_ops::remove_project(cfg, &name)
                }) {
                    self.nav.fail(e.to_string());
                }
            }

            Effect::PurgeDirectory { path } => {
                if let Err(e) = workspace_ops::purge_dir(&path) {
                    error!(path = %path.display(), error = %e, "could not delete from disk");
                    self.nav.fail(format!("Failed to delete files: {}", e));
                }
            }

            Effect::SetStatus { name, path, status } => {
                match mutate(&mut self.config, &self.store, |cfg| {
                    project_ops::set_status_at(cfg, &name, &path, status)
                }) {
                    Ok(project) => self.nav.notify(
                        MessageKind::Success,
                        format!("Status changed to '{}' for project '{}'", status, project.name),
                    ),
                    Err(e) => self.nav.fail(e.to_string()),
                }
            }

            Effect::ViewReadme { path } => match resolver::find_readme(&path) {
                Some(file) => self.shell.open_pager(&file),
                None => self.nav.notify(
                    MessageKind::Error,
                    format!("README.md not found in {}", path.display()),
                ),
            },

            Effect::Goto { path } => match self.shell.exec_shell(&path) {
                Ok(never) => match never {},
                Err(e) => {
                    error!(path = %path.display(), error = %e, "goto failed");
                    self.nav.fail(e.to_string());
                }
            },

            Effect::LaunchTool { tool, path } => self.shell.launch_tool(tool, &path),
        }
    }
}

/// Apply `op` to a copy of the config and persist it. The in-memory config
/// only changes once the save succeeded.
fn mutate<T>(
    config: &mut Config,
    store: &ConfigStore,
    op: impl FnOnce(&mut Config) -> Result<T, OpsError>,
) -> Result<T, OpsError> {
    let mut next = config.clone();
    let out = op(&mut next)?;
    if let Err(e) = store.save(&next) {
        error!(error = %e, "could not save config");
        return Err(e.into());
    }
    *config = next;
    Ok(out)
}

/// Rows shown for `screen`. Workspaces without projects show a single
/// [`Row::Empty`].
pub fn build_rows(cfg: &Config, screen: &Screen) -> Vec<Row> {
    match screen {
        Screen::Workspaces => cfg
            .workspaces()
            .iter()
            .map(|path| Row::Workspace { path: path.clone() })
            .collect(),
        Screen::Projects { workspace } => {
            let rows: Vec<Row> = resolver::projects_in_workspace(cfg, workspace)
                .into_iter()
                .map(|project| project_row(cfg, workspace.clone(), project))
                .collect();
            if rows.is_empty() {
                return vec![Row::Empty {
                    workspace: workspace.clone(),
                }];
            }
            rows
        }
        Screen::Dashboard => resolver::dashboard_rows(cfg)
            .into_iter()
            .map(|row| match row {
                DashboardRow::Project { workspace, project } => {
                    project_row(cfg, workspace, project)
                }
                DashboardRow::Empty { workspace } => Row::Empty { workspace },
            })
            .collect(),
    }
}

fn project_row(cfg: &Config, workspace: PathBuf, project: crate::model::Project) -> Row {
    let configured = resolver::is_configured(cfg, &project);
    Row::Project {
        workspace,
        project,
        configured,
    }
}

type Term = Terminal<CrosstermBackend<io::Stdout>>;

/// Run the TUI application
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = read_settings();
    let store = ConfigStore::at_default_location();
    let shell = SystemShell::new(settings.pager.clone(), &settings.shell);
    let theme = Theme::from_config(&settings.ui);
    let mut app = App::new(store, Box::new(shell), theme);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(terminal: &mut Term, app: &mut App) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;
        if app.nav.is_terminated() {
            break;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let Some(input) = input::map_key(app.nav.key_mode(), key) else {
            continue;
        };

        for effect in app.handle_input(input) {
            if matches!(
                effect,
                Effect::AddProject {
                    clone_url: Some(_),
                    ..
                }
            ) {
                app.nav.notify(MessageKind::Info, "Cloning repository...");
                terminal.draw(|frame| render::render(frame, app))?;
            }

            if effect.needs_terminal() {
                suspend(terminal)?;
                app.apply(effect);
                resume(terminal)?;
            } else {
                app.apply(effect);
            }
        }
        app.refresh_rows();
    }
    Ok(())
}

/// Hand the terminal to a child program.
fn suspend(terminal: &mut Term) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

/// Take the terminal back after a child program exited.
fn resume(terminal: &mut Term) -> io::Result<()> {
    enable_raw_mode()?;
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    terminal.clear()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Project, Status};
    use crate::ops::project_ops::tests::FakeShell;
    use crate::shell::{CloneError, ExternalTool, ShellError};
    use crate::tui::nav::Overlay;
    use pretty_assertions::assert_eq;
    use std::convert::Infallible;
    use std::fs;
    use std::path::Path;
    use std::rc::Rc;
    use tempfile::TempDir;

    impl ShellBridge for Rc<FakeShell> {
        fn launch_tool(&self, tool: ExternalTool, path: &Path) {
            (**self).launch_tool(tool, path)
        }
        fn open_pager(&self, file: &Path) {
            (**self).open_pager(file)
        }
        fn clone_repository(&self, url: &str, dest: &Path) -> Result<(), CloneError> {
            (**self).clone_repository(url, dest)
        }
        fn exec_shell(&self, dir: &Path) -> Result<Infallible, ShellError> {
            (**self).exec_shell(dir)
        }
    }

    struct Fixture {
        tmp: TempDir,
        store: ConfigStore,
        shell: Rc<FakeShell>,
    }

    impl Fixture {
        fn new() -> Self {
            let tmp = TempDir::new().unwrap();
            let store = ConfigStore::new(tmp.path().join("config").join("orbit.json"));
            Fixture {
                tmp,
                store,
                shell: Rc::new(FakeShell::default()),
            }
        }

        fn failing_clone() -> Self {
            let mut f = Fixture::new();
            f.shell = Rc::new(FakeShell {
                fail_clone: true,
                ..FakeShell::default()
            });
            f
        }

        fn app(&self) -> App {
            App::new(
                self.store.clone(),
                Box::new(self.shell.clone()),
                Theme::default(),
            )
        }

        fn ws(&self, name: &str) -> PathBuf {
            self.tmp.path().join(name)
        }

        fn calls(&self) -> Vec<String> {
            self.shell.calls.borrow().clone()
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.dispatch(Input::Char(c));
        }
    }

    fn message(app: &App) -> String {
        app.nav
            .message()
            .map(|m| m.text.clone())
            .unwrap_or_default()
    }

    fn create_workspace(app: &mut App, path: &Path) {
        app.dispatch(Input::Create);
        type_text(app, &path.display().to_string());
        app.dispatch(Input::Select);
    }

    #[test]
    fn workspace_project_status_delete_round() {
        let f = Fixture::new();
        let ws = f.ws("ws1");
        let mut app = f.app();

        // Create the workspace, accept the follow-up, add "demo" without cloning
        create_workspace(&mut app, &ws);
        assert_eq!(app.config.workspaces(), &[ws.clone()]);
        assert_eq!(
            app.nav.overlay(),
            Some(&Overlay::Confirm(Confirm::AddProjectToNewWorkspace {
                workspace: ws.clone()
            }))
        );
        app.dispatch(Input::Yes);
        type_text(&mut app, "demo");
        app.dispatch(Input::Select);
        assert!(matches!(
            app.nav.overlay(),
            Some(Overlay::Confirm(Confirm::CloneRepository { .. }))
        ));
        app.dispatch(Input::No);

        let root = ws.join("project").join("demo");
        assert_eq!(
            f.store.load().get("demo"),
            Some(&Project::new("demo", root.clone(), Status::Active))
        );
        for sub in ["repo", "docs", "secret"] {
            assert!(root.join(sub).is_dir(), "{sub}");
        }
        assert!(message(&app).starts_with("Project 'demo' created at"));

        // Change status from the project list
        app.dispatch(Input::Select);
        assert_eq!(app.nav.screen(), &Screen::Projects { workspace: ws.clone() });
        app.dispatch(Input::Status);
        app.dispatch(Input::Select);
        assert_eq!(f.store.load().get("demo").unwrap().status, Status::Archived);
        assert_eq!(message(&app), "Status changed to 'archived' for project 'demo'");

        // Delete the workspace including its files
        app.dispatch(Input::Back);
        app.dispatch(Input::Delete);
        type_text(&mut app, &ws.display().to_string());
        app.dispatch(Input::Select);
        app.dispatch(Input::Yes);
        app.dispatch(Input::Yes);

        let stored = f.store.load();
        assert!(stored.workspaces().is_empty());
        assert!(!stored.contains("demo"));
        assert!(!ws.exists());
        assert_eq!(message(&app), "Workspace and files deleted.");
        assert!(app.rows.is_empty());
    }

    #[test]
    fn keeping_files_on_delete_leaves_disk_alone() {
        let f = Fixture::new();
        let ws = f.ws("ws1");
        let mut app = f.app();
        create_workspace(&mut app, &ws);
        app.dispatch(Input::No);

        app.dispatch(Input::Delete);
        type_text(&mut app, &ws.display().to_string());
        app.dispatch(Input::Select);
        app.dispatch(Input::Yes);
        app.dispatch(Input::No);

        assert!(f.store.load().workspaces().is_empty());
        assert!(ws.is_dir());
        assert_eq!(
            message(&app),
            "Workspace removed from Orbit (files kept on disk)."
        );
    }

    #[test]
    fn mistyped_path_cancels_deletion() {
        let f = Fixture::new();
        let ws = f.ws("ws1");
        let mut app = f.app();
        create_workspace(&mut app, &ws);
        app.dispatch(Input::No);

        app.dispatch(Input::Delete);
        type_text(&mut app, "/not/it");
        app.dispatch(Input::Select);

        assert_eq!(message(&app), "Path does not match. Deletion cancelled.");
        assert_eq!(f.store.load().workspaces(), &[ws]);
    }

    #[test]
    fn startup_prunes_vanished_workspaces() {
        let f = Fixture::new();
        let kept = f.ws("kept");
        let gone = f.ws("gone");
        fs::create_dir_all(&kept).unwrap();

        let mut cfg = Config::default();
        cfg.add_workspace(&kept);
        cfg.add_workspace(&gone);
        cfg.insert(Project::new("a", kept.join("project/a"), Status::Active));
        f.store.save(&cfg).unwrap();

        let app = f.app();
        assert_eq!(app.config.workspaces(), &[kept.clone()]);
        let stored = f.store.load();
        assert_eq!(stored.workspaces(), &[kept]);
        assert!(stored.contains("a"));
    }

    #[test]
    fn duplicate_project_name_is_rejected_before_cloning() {
        let f = Fixture::new();
        let ws = f.ws("ws1");
        let mut app = f.app();
        create_workspace(&mut app, &ws);
        app.dispatch(Input::Yes);
        type_text(&mut app, "demo");
        app.dispatch(Input::Select);
        app.dispatch(Input::No);

        app.dispatch(Input::Select);
        app.dispatch(Input::Add);
        type_text(&mut app, "demo");
        app.dispatch(Input::Select);

        assert_eq!(message(&app), "Project 'demo' already exists.");
        assert_eq!(app.nav.overlay(), None);
    }

    #[test]
    fn clone_flow_clones_into_repo() {
        let f = Fixture::new();
        let ws = f.ws("ws1");
        let mut app = f.app();
        create_workspace(&mut app, &ws);
        app.dispatch(Input::Yes);
        type_text(&mut app, "demo");
        app.dispatch(Input::Select);
        app.dispatch(Input::Yes);
        type_text(&mut app, "https://example.com/u/demo.git");
        app.dispatch(Input::Select);

        let repo = ws.join("project/demo/repo");
        assert_eq!(
            f.calls(),
            vec![format!("clone https://example.com/u/demo.git {}", repo.display())]
        );
        assert!(f.store.load().contains("demo"));
        assert_eq!(message(&app), "Project 'demo' created with cloned repo");
    }

    #[test]
    fn failed_clone_registers_nothing() {
        let f = Fixture::failing_clone();
        let ws = f.ws("ws1");
        let mut app = f.app();
        create_workspace(&mut app, &ws);
        app.dispatch(Input::Yes);
        type_text(&mut app, "demo");
        app.dispatch(Input::Select);
        app.dispatch(Input::Yes);
        type_text(&mut app, "git@example.com:u/demo.git");
        app.dispatch(Input::Select);

        assert!(!f.store.load().contains("demo"));
        assert!(!ws.join("project/demo").exists());
        assert!(message(&app).starts_with("Clone failed:"));
    }

    #[test]
    fn enter_on_project_opens_readme_in_pager() {
        let f = Fixture::new();
        let ws = f.ws("ws1");
        let readme = ws.join("project/demo/repo/readme.md");
        fs::create_dir_all(readme.parent().unwrap()).unwrap();
        fs::write(&readme, "# demo\n").unwrap();

        let mut app = f.app();
        create_workspace(&mut app, &ws);
        app.dispatch(Input::No);
        app.dispatch(Input::Select);
        app.dispatch(Input::Select);

        assert_eq!(f.calls(), vec![format!("pager {}", readme.display())]);
    }

    #[test]
    fn missing_readme_is_reported() {
        let f = Fixture::new();
        let ws = f.ws("ws1");
        fs::create_dir_all(ws.join("project/demo/repo")).unwrap();

        let mut app = f.app();
        create_workspace(&mut app, &ws);
        app.dispatch(Input::No);
        app.dispatch(Input::Select);
        app.dispatch(Input::Select);

        assert!(f.calls().is_empty());
        assert_eq!(
            message(&app),
            format!("README.md not found in {}", ws.join("project/demo").display())
        );
    }

    #[test]
    fn failed_goto_stays_in_menu() {
        let f = Fixture::new();
        let ws = f.ws("ws1");
        let mut app = f.app();
        create_workspace(&mut app, &ws);
        app.dispatch(Input::No);
        app.dispatch(Input::Goto);

        assert_eq!(f.calls(), vec![format!("exec {}", ws.display())]);
        assert!(!app.nav.is_terminated());
        assert!(message(&app).starts_with("Failed to access directory:"));
    }

    #[test]
    fn tool_picker_launches_chosen_tool() {
        let f = Fixture::new();
        let ws = f.ws("ws1");
        let mut app = f.app();
        create_workspace(&mut app, &ws);
        app.dispatch(Input::No);

        app.dispatch(Input::Tools);
        app.dispatch(Input::Down);
        app.dispatch(Input::Select);
        assert_eq!(f.calls(), vec![format!("tool cursor {}", ws.display())]);
        assert_eq!(app.nav.overlay(), None);
    }

    #[test]
    fn status_on_discovered_row_registers_it() {
        let f = Fixture::new();
        let ws = f.ws("ws1");
        fs::create_dir_all(ws.join("project/found")).unwrap();

        let mut app = f.app();
        create_workspace(&mut app, &ws);
        app.dispatch(Input::No);
        app.dispatch(Input::Select);
        assert!(matches!(
            &app.rows[0],
            Row::Project {
                configured: false,
                ..
            }
        ));

        // not set -> [active, archived, done]; pick "done"
        app.dispatch(Input::Status);
        app.dispatch(Input::Down);
        app.dispatch(Input::Down);
        app.dispatch(Input::Select);

        let stored = f.store.load();
        let found = stored.get("found").unwrap();
        assert_eq!(found.status, Status::Done);
        assert_eq!(found.path, ws.join("project/found"));
        assert!(matches!(&app.rows[0], Row::Project { configured: true, .. }));
    }

    #[test]
    fn empty_workspace_shows_sentinel_row() {
        let f = Fixture::new();
        let ws = f.ws("ws1");
        let mut app = f.app();
        create_workspace(&mut app, &ws);
        app.dispatch(Input::No);
        app.dispatch(Input::Select);

        assert_eq!(app.rows, vec![Row::Empty { workspace: ws }]);
        app.dispatch(Input::Goto);
        app.dispatch(Input::Status);
        assert!(f.calls().is_empty());
        assert_eq!(app.nav.overlay(), None);
    }

    #[test]
    fn save_failure_keeps_previous_state() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let store = ConfigStore::new(blocker.join("orbit.json"));
        let mut app = App::new(
            store,
            Box::new(Rc::new(FakeShell::default())),
            Theme::default(),
        );
        assert!(message(&app).starts_with("Failed to save config"));

        create_workspace(&mut app, &tmp.path().join("ws1"));
        assert!(app.config.workspaces().is_empty());
        assert!(message(&app).starts_with("could not write"));
        assert_eq!(app.nav.overlay(), None);
    }
}
