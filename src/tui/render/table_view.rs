use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::helpers::{fit, pad_to_width};
use crate::ops::workspace_ops::display_name;
use crate::tui::app::App;
use crate::tui::nav::{Row, Screen};
use crate::tui::theme::Theme;
use crate::util::time::last_modified_label;
use crate::util::unicode;

const INDICATOR_W: usize = 3;
const GAP: usize = 2;
const NONE: &str = "none";

/// One table cell: text plus its foreground color
struct Cell {
    text: String,
    color: Color,
}

impl Cell {
    fn new(text: impl Into<String>, color: Color) -> Self {
        Cell {
            text: text.into(),
            color,
        }
    }
}

/// Column headers for a screen. The last column takes the remaining width.
pub(super) fn headers(screen: &Screen) -> &'static [&'static str] {
    match screen {
        Screen::Workspaces => &["Workspace", "Last Modified", "Path"],
        Screen::Projects { .. } => &["Project", "Status", "Last Modified", "Path"],
        Screen::Dashboard => &["Workspace", "Project", "Status", "Last Modified", "Path"],
    }
}

fn max_width(header: &str) -> usize {
    match header {
        "Status" => 10,
        "Last Modified" => 18,
        _ => 24,
    }
}

fn row_cells(row: &Row, dashboard: bool, theme: &Theme) -> Vec<Cell> {
    let mut cells = Vec::new();
    match row {
        Row::Workspace { path } => {
            cells.push(Cell::new(display_name(path), theme.text_bright));
            cells.push(Cell::new(last_modified_label(path), theme.text));
            cells.push(Cell::new(path.display().to_string(), theme.dim));
        }
        Row::Project {
            workspace, project, ..
        } => {
            if dashboard {
                cells.push(Cell::new(display_name(workspace), theme.purple));
            }
            let name = match &project.alias {
                Some(alias) if *alias != project.name => format!("{} ({})", project.name, alias),
                _ => project.name.clone(),
            };
            cells.push(Cell::new(name, theme.text_bright));
            cells.push(Cell::new(
                project.status.as_str(),
                theme.status_color(project.status),
            ));
            cells.push(Cell::new(last_modified_label(&project.path), theme.text));
            cells.push(Cell::new(project.path.display().to_string(), theme.dim));
        }
        Row::Empty { workspace } => {
            if dashboard {
                cells.push(Cell::new(display_name(workspace), theme.purple));
            }
            cells.push(Cell::new(NONE, theme.dim));
            cells.push(Cell::new(NONE, theme.dim));
            cells.push(Cell::new(NONE, theme.dim));
            cells.push(Cell::new("", theme.dim));
        }
    }
    cells
}

/// Widths of every column but the last, sized to content and capped.
fn column_widths(headers: &[&str], body: &[Vec<Cell>]) -> Vec<usize> {
    headers[..headers.len() - 1]
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let content = body
                .iter()
                .filter_map(|cells| cells.get(i))
                .map(|c| unicode::display_width(&c.text))
                .max()
                .unwrap_or(0);
            content
                .max(unicode::display_width(header))
                .min(max_width(header))
        })
        .collect()
}

/// First row to draw so the cursor stays visible
fn scroll_offset(cursor: usize, visible: usize) -> usize {
    if visible == 0 {
        return 0;
    }
    (cursor + 1).saturating_sub(visible)
}

/// Render the row table for the current screen
pub fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let bg = theme.background;
    let bg_style = Style::default().bg(bg);
    let width = area.width as usize;
    let screen = app.nav.screen();

    if app.rows.is_empty() {
        let hint = match screen {
            Screen::Workspaces => " No workspaces yet. Press c to create one.",
            _ => " Nothing to show.",
        };
        let line = Line::from(Span::styled(hint, Style::default().fg(theme.dim).bg(bg)));
        frame.render_widget(Paragraph::new(line).style(bg_style), area);
        return;
    }

    let headers = headers(screen);
    let dashboard = *screen == Screen::Dashboard;
    let body: Vec<Vec<Cell>> = app
        .rows
        .iter()
        .map(|row| row_cells(row, dashboard, theme))
        .collect();
    let widths = column_widths(headers, &body);
    let fixed: usize = widths.iter().map(|w| w + GAP).sum();
    let last_w = width.saturating_sub(INDICATOR_W + fixed);

    let mut lines: Vec<Line> = Vec::new();

    // Header
    let header_style = Style::default()
        .fg(theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let mut spans = vec![Span::styled(" ".repeat(INDICATOR_W), bg_style)];
    for (header, w) in headers.iter().zip(&widths) {
        spans.push(Span::styled(fit(header, *w), header_style));
        spans.push(Span::styled(" ".repeat(GAP), bg_style));
    }
    if let Some(last) = headers.last() {
        spans.push(Span::styled(
            unicode::truncate_to_width(last, last_w),
            header_style,
        ));
    }
    pad_to_width(&mut spans, width, bg_style);
    lines.push(Line::from(spans));

    // Rows
    let visible = (area.height as usize).saturating_sub(1);
    let offset = scroll_offset(app.nav.cursor(), visible);
    for (i, cells) in body.iter().enumerate().skip(offset).take(visible) {
        let selected = i == app.nav.cursor() && app.nav.overlay().is_none();
        let row_bg = if selected { theme.selection_bg } else { bg };
        let pad_style = Style::default().bg(row_bg);
        let cell_style = |color: Color| {
            let style = Style::default().fg(color).bg(row_bg);
            if selected {
                style.add_modifier(Modifier::BOLD)
            } else {
                style
            }
        };

        let indicator = if selected { " \u{25B6} " } else { "   " };
        let mut spans = vec![Span::styled(indicator, cell_style(theme.text_bright))];
        for (cell, w) in cells.iter().zip(&widths) {
            spans.push(Span::styled(fit(&cell.text, *w), cell_style(cell.color)));
            spans.push(Span::styled(" ".repeat(GAP), pad_style));
        }
        if let Some(cell) = cells.get(widths.len()) {
            spans.push(Span::styled(
                unicode::truncate_start_to_width(&cell.text, last_w),
                cell_style(cell.color),
            ));
        }
        pad_to_width(&mut spans, width, pad_style);
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).style(bg_style), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_keeps_cursor_visible() {
        assert_eq!(scroll_offset(0, 5), 0);
        assert_eq!(scroll_offset(4, 5), 0);
        assert_eq!(scroll_offset(5, 5), 1);
        assert_eq!(scroll_offset(12, 5), 8);
        assert_eq!(scroll_offset(3, 0), 0);
    }

    #[test]
    fn widths_fit_content_within_caps() {
        let theme = Theme::default();
        let body = vec![vec![
            Cell::new("a-rather-long-project-name-indeed", theme.text),
            Cell::new("archived", theme.text),
            Cell::new("Today 10:00", theme.text),
            Cell::new("/x", theme.text),
        ]];
        let headers = headers(&Screen::Projects {
            workspace: "/w".into(),
        });
        assert_eq!(column_widths(headers, &body), vec![24, 8, 13]);
    }
}
