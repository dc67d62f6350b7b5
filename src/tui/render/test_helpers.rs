use std::fs;
use std::path::PathBuf;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::io::config_store::ConfigStore;
use crate::ops::project_ops::tests::FakeShell;
use crate::tui::app::App;
use crate::tui::theme::Theme;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Temp directory holding a config store and workspace directories.
pub struct RenderFixture {
    pub tmp: TempDir,
    store: ConfigStore,
}

impl RenderFixture {
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let store = ConfigStore::new(tmp.path().join("orbit.json"));
        RenderFixture { tmp, store }
    }

    /// Create a workspace directory and register it.
    pub fn workspace(&self, name: &str) -> PathBuf {
        let path = self.tmp.path().join(name);
        fs::create_dir_all(&path).unwrap();
        let mut cfg = self.store.load();
        cfg.add_workspace(&path);
        self.store.save(&cfg).unwrap();
        path
    }

    pub fn app(&self) -> App {
        App::new(
            self.store.clone(),
            Box::new(FakeShell::default()),
            Theme::default(),
        )
    }
}
