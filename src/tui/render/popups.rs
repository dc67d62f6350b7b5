use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::helpers::{centered_rect_fixed, pad_to_width};
use crate::model::Status;
use crate::shell::ExternalTool;
use crate::tui::app::App;
use crate::tui::nav::{Confirm, Overlay, Prompt};
use crate::tui::theme::Theme;
use crate::util::unicode;

/// Render whichever overlay is open on top of the table
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    match app.nav.overlay() {
        None => {}
        Some(Overlay::Prompt { prompt, buffer }) => {
            render_prompt(frame, &app.theme, prompt, buffer, area)
        }
        Some(Overlay::Confirm(question)) => render_confirm(frame, &app.theme, question, area),
        Some(Overlay::StatusPicker {
            name,
            current,
            options,
            index,
            ..
        }) => render_status_picker(frame, &app.theme, name, *current, options, *index, area),
        Some(Overlay::Tools { index, .. }) => render_tools(frame, &app.theme, *index, area),
    }
}

/// Draw `lines` in a bordered box centered in `area`
fn draw_popup(frame: &mut Frame, theme: &Theme, title: &str, lines: Vec<Line>, width: u16, area: Rect) {
    let bg = theme.background;
    let popup_h = (lines.len() as u16 + 2).min(area.height);
    let overlay_area = centered_rect_fixed(width, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", title),
            Style::default()
                .fg(theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.highlight).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, overlay_area);
}

fn popup_width(area: Rect) -> u16 {
    let target = (area.width as f32 * 0.6) as u16;
    target.clamp(40, 72).min(area.width.saturating_sub(2))
}

fn render_prompt(frame: &mut Frame, theme: &Theme, prompt: &Prompt, buffer: &str, area: Rect) {
    let bg = theme.background;
    let width = popup_width(area);
    let inner_w = width.saturating_sub(4) as usize;

    let mut lines = vec![
        Line::from(Span::styled(
            format!(" {}", prompt.label()),
            Style::default().fg(theme.text).bg(bg),
        )),
        Line::from(""),
    ];

    // Input line: "> text▌", placeholder dimmed while empty
    let mut input = vec![Span::styled(" > ", Style::default().fg(theme.highlight).bg(bg))];
    if buffer.is_empty() {
        input.push(Span::styled(
            "\u{258C}",
            Style::default().fg(theme.highlight).bg(bg),
        ));
        input.push(Span::styled(
            prompt.placeholder(),
            Style::default().fg(theme.dim).bg(bg),
        ));
    } else {
        input.push(Span::styled(
            unicode::truncate_start_to_width(buffer, inner_w.saturating_sub(4)),
            Style::default().fg(theme.text_bright).bg(bg),
        ));
        input.push(Span::styled(
            "\u{258C}",
            Style::default().fg(theme.highlight).bg(bg),
        ));
    }
    lines.push(Line::from(input));

    draw_popup(frame, theme, prompt.title(), lines, width, area);
}

fn render_confirm(frame: &mut Frame, theme: &Theme, question: &Confirm, area: Rect) {
    let bg = theme.background;
    let color = if question.is_destructive() {
        theme.red
    } else {
        theme.text_bright
    };
    let lines = vec![
        Line::from(Span::styled(
            format!(" {}", question.question()),
            Style::default().fg(color).bg(bg).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(" y", Style::default().fg(theme.highlight).bg(bg)),
            Span::styled(" yes   ", Style::default().fg(theme.text).bg(bg)),
            Span::styled("n", Style::default().fg(theme.highlight).bg(bg)),
            Span::styled(" no", Style::default().fg(theme.text).bg(bg)),
        ]),
    ];
    draw_popup(frame, theme, "Confirm", lines, popup_width(area), area);
}

/// Lines of a vertical menu; the selected entry is drawn on the selection color
fn menu_lines<'a>(theme: &Theme, entries: Vec<(String, Color)>, index: usize, width: usize) -> Vec<Line<'a>> {
    entries
        .into_iter()
        .enumerate()
        .map(|(i, (label, color))| {
            let selected = i == index;
            let row_bg = if selected { theme.selection_bg } else { theme.background };
            let mut style = Style::default().fg(color).bg(row_bg);
            if selected {
                style = style.add_modifier(Modifier::BOLD);
            }
            let indicator = if selected { " \u{25B6} " } else { "   " };
            let mut spans = vec![Span::styled(indicator, style), Span::styled(label, style)];
            pad_to_width(&mut spans, width, Style::default().bg(row_bg));
            Line::from(spans)
        })
        .collect()
}

fn render_status_picker(
    frame: &mut Frame,
    theme: &Theme,
    name: &str,
    current: Status,
    options: &[Status],
    index: usize,
    area: Rect,
) {
    let bg = theme.background;
    let width: u16 = 44.min(area.width.saturating_sub(2));
    let inner_w = width.saturating_sub(2) as usize;

    let mut lines = vec![
        Line::from(vec![
            Span::styled(" Current: ", Style::default().fg(theme.text).bg(bg)),
            Span::styled(
                current.as_str(),
                Style::default().fg(theme.status_color(current)).bg(bg),
            ),
        ]),
        Line::from(""),
    ];
    let entries = options
        .iter()
        .map(|s| (s.as_str().to_string(), theme.status_color(*s)))
        .collect();
    lines.extend(menu_lines(theme, entries, index, inner_w));

    let title = format!("Status of {}", unicode::truncate_to_width(name, 24));
    draw_popup(frame, theme, &title, lines, width, area);
}

fn render_tools(frame: &mut Frame, theme: &Theme, index: usize, area: Rect) {
    let width: u16 = 36.min(area.width.saturating_sub(2));
    let inner_w = width.saturating_sub(2) as usize;
    let entries = ExternalTool::ALL
        .iter()
        .map(|t| (t.label().to_string(), theme.text_bright))
        .collect();
    let lines = menu_lines(theme, entries, index, inner_w);
    draw_popup(frame, theme, "Tools", lines, width, area);
}
