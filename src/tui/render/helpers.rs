use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;

use crate::util::unicode;

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Pad spans to fill `target_width` with background.
pub(super) fn pad_to_width<'a>(spans: &mut Vec<Span<'a>>, target_width: usize, pad_style: Style) {
    let used = spans_width(spans);
    if used < target_width {
        spans.push(Span::styled(" ".repeat(target_width - used), pad_style));
    }
}

/// Truncate `text` to `width` cells and pad it on the right to exactly `width`.
pub(super) fn fit(text: &str, width: usize) -> String {
    let mut out = unicode::truncate_to_width(text, width);
    let used = unicode::display_width(&out);
    if used < width {
        out.push_str(&" ".repeat(width - used));
    }
    out
}

pub(super) fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}
