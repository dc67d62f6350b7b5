pub mod helpers;
pub mod popups;
pub mod status_row;
pub mod table_view;
pub mod title_bar;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::App;

/// Main render function: title, table, message line, help bar, then any overlay
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title + separator
            Constraint::Min(1),    // table
            Constraint::Length(1), // message
            Constraint::Length(1), // help bar
        ])
        .split(area);

    title_bar::render_title_bar(frame, app, chunks[0]);
    table_view::render_table(frame, app, chunks[1]);
    status_row::render_message_row(frame, app, chunks[2]);
    status_row::render_help_bar(frame, app, chunks[3]);

    popups::render_overlay(frame, app, area);
}
