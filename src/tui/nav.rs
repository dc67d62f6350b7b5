//! Menu state machine.
//!
//! [`Nav::handle`] takes one [`Input`] plus the rows currently on screen and
//! returns the [`Effect`]s the caller must perform. It never touches the
//! config or the filesystem; results of effects that need follow-up
//! (validation, workspace creation, failures) are fed back through
//! [`Nav::confirm`], [`Nav::notify`] and [`Nav::fail`].

use std::path::{Path, PathBuf};

use crate::model::{Project, Status};
use crate::shell::ExternalTool;
use crate::util::unicode::pop_grapheme;

/// Top-level screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Workspaces,
    Projects { workspace: PathBuf },
    Dashboard,
}

/// A displayed row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Workspace {
        path: PathBuf,
    },
    Project {
        workspace: PathBuf,
        project: Project,
        /// False for directories discovered on disk only
        configured: bool,
    },
    /// Placeholder for a workspace without projects; never actionable
    Empty {
        workspace: PathBuf,
    },
}

impl Row {
    fn target_path(&self) -> Option<&Path> {
        match self {
            Row::Workspace { path } => Some(path),
            Row::Project { project, .. } => Some(&project.path),
            Row::Empty { .. } => None,
        }
    }
}

/// Abstract user input, already decoded from keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Up,
    Down,
    Select,
    Back,
    Quit,
    Create,
    Delete,
    Goto,
    Dashboard,
    Status,
    Add,
    Tools,
    Yes,
    No,
    Char(char),
    Backspace,
}

/// Free-text prompts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    WorkspacePath,
    ProjectName { workspace: PathBuf },
    CloneUrl { workspace: PathBuf, name: String },
    RetypeWorkspace { path: PathBuf },
    RetypeProject { name: String, path: PathBuf },
}

impl Prompt {
    pub fn title(&self) -> &'static str {
        match self {
            Prompt::WorkspacePath => "Create Workspace",
            Prompt::ProjectName { .. } | Prompt::CloneUrl { .. } => "Add Project",
            Prompt::RetypeWorkspace { .. } => "Delete Workspace",
            Prompt::RetypeProject { .. } => "Delete Project",
        }
    }

    pub fn label(&self) -> String {
        match self {
            Prompt::WorkspacePath => "Enter workspace path:".into(),
            Prompt::ProjectName { .. } => "Enter project name:".into(),
            Prompt::CloneUrl { .. } => "Enter clone URL:".into(),
            Prompt::RetypeWorkspace { path } | Prompt::RetypeProject { path, .. } => {
                format!("Type the exact path to confirm deletion: {}", path.display())
            }
        }
    }

    /// Hint shown while the buffer is empty
    pub fn placeholder(&self) -> &'static str {
        match self {
            Prompt::WorkspacePath => "~/workspace/orbit_ws1",
            Prompt::ProjectName { .. } => "my-project",
            Prompt::CloneUrl { .. } => "https://github.com/user/repo.git",
            Prompt::RetypeWorkspace { .. } | Prompt::RetypeProject { .. } => "",
        }
    }
}

/// Yes/no questions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirm {
    AddProjectToNewWorkspace { workspace: PathBuf },
    CloneRepository { workspace: PathBuf, name: String },
    DeleteWorkspace { path: PathBuf },
    PurgeWorkspace { path: PathBuf },
    DeleteProject { name: String, path: PathBuf },
    PurgeProject { path: PathBuf },
}

impl Confirm {
    pub fn question(&self) -> String {
        match self {
            Confirm::AddProjectToNewWorkspace { .. } => "Create a project in this workspace?".into(),
            Confirm::CloneRepository { .. } => "Clone a repository?".into(),
            Confirm::DeleteWorkspace { path } => format!(
                "Delete workspace '{}'?",
                crate::ops::workspace_ops::display_name(path)
            ),
            Confirm::PurgeWorkspace { .. } => "Also delete workspace files from disk?".into(),
            Confirm::DeleteProject { name, .. } => format!("Delete project '{}'?", name),
            Confirm::PurgeProject { .. } => "Also delete project files from disk?".into(),
        }
    }

    /// Destructive questions are drawn in the warning color
    pub fn is_destructive(&self) -> bool {
        !matches!(
            self,
            Confirm::AddProjectToNewWorkspace { .. } | Confirm::CloneRepository { .. }
        )
    }
}

/// Modal layer drawn over the current screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    Tools {
        path: PathBuf,
        index: usize,
    },
    Prompt {
        prompt: Prompt,
        buffer: String,
    },
    Confirm(Confirm),
    StatusPicker {
        name: String,
        path: PathBuf,
        current: Status,
        options: Vec<Status>,
        index: usize,
    },
}

/// How keys should be decoded for the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    Normal,
    Prompt,
    Confirm,
    Picker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

/// One-line feedback shown under the table until the next key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

/// Work the caller performs on behalf of the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Resolve the prompt input to a path, create and register it
    CreateWorkspace { input: String },
    /// Validate a new project name before asking about cloning
    CheckNewProject { workspace: PathBuf, name: String },
    AddProject {
        workspace: PathBuf,
        name: String,
        clone_url: Option<String>,
    },
    RemoveWorkspace { path: PathBuf },
    RemoveProject { name: String },
    PurgeDirectory { path: PathBuf },
    SetStatus {
        name: String,
        path: PathBuf,
        status: Status,
    },
    ViewReadme { path: PathBuf },
    /// Replace the process with a shell in `path`
    Goto { path: PathBuf },
    LaunchTool { tool: ExternalTool, path: PathBuf },
}

impl Effect {
    /// Effects that hand the terminal to another program
    pub fn needs_terminal(&self) -> bool {
        matches!(
            self,
            Effect::ViewReadme { .. } | Effect::Goto { .. } | Effect::LaunchTool { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nav {
    screen: Screen,
    cursor: usize,
    /// Workspace cursor restored when returning to the workspace list
    parent_cursor: usize,
    overlay: Option<Overlay>,
    message: Option<Message>,
    terminated: bool,
}

impl Default for Nav {
    fn default() -> Self {
        Nav::new()
    }
}

impl Nav {
    pub fn new() -> Self {
        Nav {
            screen: Screen::Workspaces,
            cursor: 0,
            parent_cursor: 0,
            overlay: None,
            message: None,
            terminated: false,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn key_mode(&self) -> KeyMode {
        match &self.overlay {
            None => KeyMode::Normal,
            Some(Overlay::Prompt { .. }) => KeyMode::Prompt,
            Some(Overlay::Confirm(_)) => KeyMode::Confirm,
            Some(Overlay::Tools { .. } | Overlay::StatusPicker { .. }) => KeyMode::Picker,
        }
    }

    /// Keep the cursor inside `[0, len - 1]` after the row list changed.
    pub fn clamp(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Show a message without changing the state.
    pub fn notify(&mut self, kind: MessageKind, text: impl Into<String>) {
        self.message = Some(Message {
            kind,
            text: text.into(),
        });
    }

    /// Abandon any open overlay and show an error.
    pub fn fail(&mut self, text: impl Into<String>) {
        self.overlay = None;
        self.notify(MessageKind::Error, text);
    }

    /// Ask a yes/no question.
    pub fn confirm(&mut self, question: Confirm) {
        self.overlay = Some(Overlay::Confirm(question));
    }

    /// Apply one input. `rows` are the rows currently displayed.
    pub fn handle(&mut self, input: Input, rows: &[Row]) -> Vec<Effect> {
        if self.terminated {
            return Vec::new();
        }
        if input == Input::Quit {
            self.overlay = None;
            self.terminated = true;
            return Vec::new();
        }
        self.message = None;
        self.clamp(rows.len());

        match self.overlay.take() {
            Some(overlay) => self.handle_overlay(overlay, input),
            None => self.handle_screen(input, rows),
        }
    }

    fn selected<'a>(&self, rows: &'a [Row]) -> Option<&'a Row> {
        rows.get(self.cursor)
            .filter(|r| !matches!(r, Row::Empty { .. }))
    }

    fn open_prompt(&mut self, prompt: Prompt) {
        self.overlay = Some(Overlay::Prompt {
            prompt,
            buffer: String::new(),
        });
    }

    fn enter_screen(&mut self, screen: Screen) {
        if self.screen == Screen::Workspaces {
            self.parent_cursor = self.cursor;
        }
        self.screen = screen;
        self.cursor = 0;
    }

    fn handle_screen(&mut self, input: Input, rows: &[Row]) -> Vec<Effect> {
        match input {
            Input::Up => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            Input::Down => {
                if self.cursor + 1 < rows.len() {
                    self.cursor += 1;
                }
            }
            Input::Back => {
                if self.screen != Screen::Workspaces {
                    self.screen = Screen::Workspaces;
                    self.cursor = self.parent_cursor;
                }
            }
            Input::Create => {
                if self.screen == Screen::Workspaces {
                    self.open_prompt(Prompt::WorkspacePath);
                }
            }
            Input::Dashboard => {
                if self.screen == Screen::Workspaces {
                    self.enter_screen(Screen::Dashboard);
                }
            }
            Input::Add => {
                if let Screen::Projects { workspace } = &self.screen {
                    let workspace = workspace.clone();
                    self.open_prompt(Prompt::ProjectName { workspace });
                }
            }
            Input::Select => match self.selected(rows) {
                Some(Row::Workspace { path }) => {
                    let workspace = path.clone();
                    self.enter_screen(Screen::Projects { workspace });
                }
                Some(Row::Project { project, .. }) => {
                    return vec![Effect::ViewReadme {
                        path: project.path.clone(),
                    }];
                }
                _ => {}
            },
            Input::Delete => match self.selected(rows) {
                Some(Row::Workspace { path }) => {
                    let path = path.clone();
                    self.open_prompt(Prompt::RetypeWorkspace { path });
                }
                Some(Row::Project {
                    configured: false, ..
                }) => {
                    self.notify(MessageKind::Error, "Project not found.");
                }
                Some(Row::Project { project, .. }) => {
                    self.open_prompt(Prompt::RetypeProject {
                        name: project.name.clone(),
                        path: project.path.clone(),
                    });
                }
                _ => {}
            },
            Input::Goto => {
                if let Some(path) = self.selected(rows).and_then(Row::target_path) {
                    return vec![Effect::Goto {
                        path: path.to_path_buf(),
                    }];
                }
            }
            Input::Status => {
                if let Some(Row::Project { project, .. }) = self.selected(rows) {
                    self.overlay = Some(Overlay::StatusPicker {
                        name: project.name.clone(),
                        path: project.path.clone(),
                        current: project.status,
                        options: project.status.others(),
                        index: 0,
                    });
                }
            }
            Input::Tools => {
                if let Some(path) = self.selected(rows).and_then(Row::target_path) {
                    self.overlay = Some(Overlay::Tools {
                        path: path.to_path_buf(),
                        index: 0,
                    });
                }
            }
            Input::Quit | Input::Yes | Input::No | Input::Char(_) | Input::Backspace => {}
        }
        Vec::new()
    }

    fn handle_overlay(&mut self, overlay: Overlay, input: Input) -> Vec<Effect> {
        match overlay {
            Overlay::Tools { path, index } => match input {
                Input::Up => {
                    self.overlay = Some(Overlay::Tools {
                        path,
                        index: index.saturating_sub(1),
                    });
                }
                Input::Down => {
                    self.overlay = Some(Overlay::Tools {
                        path,
                        index: (index + 1).min(ExternalTool::ALL.len() - 1),
                    });
                }
                Input::Select => {
                    let tool = ExternalTool::ALL[index.min(ExternalTool::ALL.len() - 1)];
                    return vec![Effect::LaunchTool { tool, path }];
                }
                Input::Back => {}
                _ => self.overlay = Some(Overlay::Tools { path, index }),
            },

            Overlay::StatusPicker {
                name,
                path,
                current,
                options,
                index,
            } => {
                let last = options.len().saturating_sub(1);
                let index = match input {
                    Input::Up => index.saturating_sub(1),
                    Input::Down => (index + 1).min(last),
                    Input::Select => {
                        return match options.get(index) {
                            Some(&status) => vec![Effect::SetStatus { name, path, status }],
                            None => Vec::new(),
                        };
                    }
                    Input::Back => return Vec::new(),
                    _ => index,
                };
                self.overlay = Some(Overlay::StatusPicker {
                    name,
                    path,
                    current,
                    options,
                    index,
                });
            }

            Overlay::Prompt { prompt, mut buffer } => match input {
                Input::Char(c) => {
                    buffer.push(c);
                    self.overlay = Some(Overlay::Prompt { prompt, buffer });
                }
                Input::Backspace => {
                    pop_grapheme(&mut buffer);
                    self.overlay = Some(Overlay::Prompt { prompt, buffer });
                }
                Input::Select => return self.submit(prompt, buffer.trim()),
                Input::Back => {}
                _ => self.overlay = Some(Overlay::Prompt { prompt, buffer }),
            },

            Overlay::Confirm(question) => match input {
                Input::Yes => return self.accept(question),
                Input::No => return self.decline(question),
                _ => self.overlay = Some(Overlay::Confirm(question)),
            },
        }
        Vec::new()
    }

    fn submit(&mut self, prompt: Prompt, text: &str) -> Vec<Effect> {
        match prompt {
            // Empty input selects the default workspace location
            Prompt::WorkspacePath => vec![Effect::CreateWorkspace {
                input: text.to_string(),
            }],
            _ if text.is_empty() => Vec::new(),
            Prompt::ProjectName { workspace } => vec![Effect::CheckNewProject {
                workspace,
                name: text.to_string(),
            }],
            Prompt::CloneUrl { workspace, name } => vec![Effect::AddProject {
                workspace,
                name,
                clone_url: Some(text.to_string()),
            }],
            Prompt::RetypeWorkspace { path } => {
                if path_matches(&path, text) {
                    self.confirm(Confirm::DeleteWorkspace { path });
                } else {
                    self.notify(MessageKind::Error, "Path does not match. Deletion cancelled.");
                }
                Vec::new()
            }
            Prompt::RetypeProject { name, path } => {
                if path_matches(&path, text) {
                    self.confirm(Confirm::DeleteProject { name, path });
                } else {
                    self.notify(MessageKind::Error, "Path does not match. Deletion cancelled.");
                }
                Vec::new()
            }
        }
    }

    fn accept(&mut self, question: Confirm) -> Vec<Effect> {
        match question {
            Confirm::AddProjectToNewWorkspace { workspace } => {
                self.open_prompt(Prompt::ProjectName { workspace });
                Vec::new()
            }
            Confirm::CloneRepository { workspace, name } => {
                self.open_prompt(Prompt::CloneUrl { workspace, name });
                Vec::new()
            }
            Confirm::DeleteWorkspace { path } => {
                self.confirm(Confirm::PurgeWorkspace { path: path.clone() });
                vec![Effect::RemoveWorkspace { path }]
            }
            Confirm::DeleteProject { name, path } => {
                self.confirm(Confirm::PurgeProject { path });
                vec![Effect::RemoveProject { name }]
            }
            Confirm::PurgeWorkspace { path } => {
                self.notify(MessageKind::Success, "Workspace and files deleted.");
                vec![Effect::PurgeDirectory { path }]
            }
            Confirm::PurgeProject { path } => {
                self.notify(MessageKind::Success, "Project and files deleted.");
                vec![Effect::PurgeDirectory { path }]
            }
        }
    }

    fn decline(&mut self, question: Confirm) -> Vec<Effect> {
        match question {
            Confirm::AddProjectToNewWorkspace { .. } => {}
            Confirm::CloneRepository { workspace, name } => {
                return vec![Effect::AddProject {
                    workspace,
                    name,
                    clone_url: None,
                }];
            }
            Confirm::DeleteWorkspace { .. } | Confirm::DeleteProject { .. } => {
                self.notify(MessageKind::Info, "Deletion cancelled.");
            }
            Confirm::PurgeWorkspace { .. } => self.notify(
                MessageKind::Success,
                "Workspace removed from Orbit (files kept on disk).",
            ),
            Confirm::PurgeProject { .. } => self.notify(
                MessageKind::Success,
                "Project removed from Orbit (files kept on disk).",
            ),
        }
        Vec::new()
    }
}

/// Typed confirmation must be the exact path; only surrounding whitespace
/// is ignored.
fn path_matches(path: &Path, typed: &str) -> bool {
    path.to_string_lossy() == typed.trim()
}
