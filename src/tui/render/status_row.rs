use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::helpers::{pad_to_width, spans_width};
use crate::tui::app::App;
use crate::tui::nav::{KeyMode, MessageKind, Screen};
use crate::util::unicode;

/// Key hints for the current screen and mode as `(key, action)` pairs
pub(super) fn key_hints(screen: &Screen, mode: KeyMode) -> Vec<(&'static str, &'static str)> {
    match mode {
        KeyMode::Prompt => vec![("enter", "submit"), ("esc", "cancel")],
        KeyMode::Confirm => vec![("y", "yes"), ("n", "no")],
        KeyMode::Picker => vec![("\u{2191}\u{2193}", "move"), ("enter", "choose"), ("esc", "close")],
        KeyMode::Normal => match screen {
            Screen::Workspaces => vec![
                ("enter", "open"),
                ("c", "create"),
                ("d", "delete"),
                ("g", "goto"),
                ("h", "dashboard"),
                ("m", "tools"),
                ("q", "quit"),
            ],
            Screen::Projects { .. } => vec![
                ("enter", "readme"),
                ("a", "add"),
                ("s", "status"),
                ("d", "delete"),
                ("g", "goto"),
                ("m", "tools"),
                ("r", "return"),
                ("q", "quit"),
            ],
            Screen::Dashboard => vec![
                ("enter", "readme"),
                ("s", "status"),
                ("d", "delete"),
                ("g", "goto"),
                ("m", "tools"),
                ("r", "return"),
                ("q", "quit"),
            ],
        },
    }
}

/// Render the one-line message under the table
pub fn render_message_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let bg_style = Style::default().bg(bg);
    let width = area.width as usize;

    let mut spans = Vec::new();
    if let Some(message) = app.nav.message() {
        let color = match message.kind {
            MessageKind::Info => app.theme.blue,
            MessageKind::Success => app.theme.green,
            MessageKind::Error => app.theme.red,
        };
        let text = format!(" {}", message.text);
        spans.push(Span::styled(
            unicode::truncate_to_width(&text, width),
            Style::default().fg(color).bg(bg),
        ));
    }
    pad_to_width(&mut spans, width, bg_style);
    frame.render_widget(Paragraph::new(Line::from(spans)).style(bg_style), area);
}

/// Render the help bar: key badges followed by their action
pub fn render_help_bar(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let bg_style = Style::default().bg(bg);
    let width = area.width as usize;
    let badge_style = Style::default()
        .fg(app.theme.badge_fg)
        .bg(app.theme.dim)
        .add_modifier(Modifier::BOLD);
    let label_style = Style::default().fg(app.theme.dim).bg(bg);

    let mut spans: Vec<Span> = vec![Span::styled(" ", bg_style)];
    for (key, action) in key_hints(app.nav.screen(), app.nav.key_mode()) {
        let hint = [
            Span::styled(format!(" {} ", key), badge_style),
            Span::styled(format!(" {}  ", action), label_style),
        ];
        // Drop hints that no longer fit instead of cutting one in half
        if spans_width(&spans) + spans_width(&hint) > width {
            break;
        }
        spans.extend(hint);
    }
    pad_to_width(&mut spans, width, bg_style);
    frame.render_widget(Paragraph::new(Line::from(spans)).style(bg_style), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn return_is_not_offered_at_top_level() {
        let keys: Vec<&str> = key_hints(&Screen::Workspaces, KeyMode::Normal)
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert!(!keys.contains(&"r"));
        assert!(keys.contains(&"c"));
        assert!(keys.contains(&"h"));
    }

    #[test]
    fn add_is_only_offered_in_project_list() {
        let has_add = |screen: &Screen| {
            key_hints(screen, KeyMode::Normal)
                .iter()
                .any(|(k, _)| *k == "a")
        };
        assert!(has_add(&Screen::Projects {
            workspace: "/w".into()
        }));
        assert!(!has_add(&Screen::Dashboard));
        assert!(!has_add(&Screen::Workspaces));
    }
}
