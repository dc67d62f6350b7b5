use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::workspace_ops::display_name;
use crate::tui::app::App;
use crate::tui::nav::Screen;

/// Heading for the current screen
pub(super) fn screen_title(screen: &Screen) -> String {
    match screen {
        Screen::Workspaces => "Workspaces".to_string(),
        Screen::Projects { workspace } => format!("Projects in {}", display_name(workspace)),
        Screen::Dashboard => "Dashboard".to_string(),
    }
}

/// Render the title row and the separator below it
pub fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(1), // separator
        ])
        .split(area);

    let bg = app.theme.background;
    let bg_style = Style::default().bg(bg);
    let spans = vec![
        Span::styled(" ", bg_style),
        Span::styled(
            "\u{25C9} Orbit",
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" \u{2502} ", Style::default().fg(app.theme.dim).bg(bg)),
        Span::styled(
            screen_title(app.nav.screen()),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)).style(bg_style), chunks[0]);

    let separator = "\u{2500}".repeat(area.width as usize);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            separator,
            Style::default().fg(app.theme.dim).bg(bg),
        ))),
        chunks[1],
    );
}
