use ratatui::layout::{Constraint, Direction, Layout, Rect};
use log::debug;

/// Rect centered in `r`, `percent_x` wide and `height` rows tall
///
/// The height is clamped to the available area so tall messages still fit
/// on small terminals.
pub fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let height = height.min(r.height);
    debug!("Creating centered rect with percent_x: {}, height: {}, in area: {:?}", percent_x, height, r);
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((r.height - height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
