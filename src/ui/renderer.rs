use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use log::debug;
use crate::ui::components::{connection_settings, database_list, popups};
use crate::ui::keeper::KeeperApp;
use crate::ui::models::PopupState;

/// Height of the connection panel: four fields, the help line and borders
const CONNECTION_PANEL_HEIGHT: u16 = 7;

/// Render the UI
///
/// Title bar, connection panel, database list and status bar, with any
/// popup drawn last so it sits on top.
pub fn ui(f: &mut Frame, app: &mut KeeperApp) {
    debug!("Starting UI rendering");

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),                       // Title bar
            Constraint::Length(CONNECTION_PANEL_HEIGHT), // Connection panel
            Constraint::Min(0),                          // Database list
            Constraint::Length(1),                       // Status bar
        ])
        .split(f.size());

    let title = Paragraph::new(Line::from(vec![
        Span::styled("sqlkeeper ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::raw("- MySQL Backup & Restore"),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, chunks[0]);

    connection_settings::render_connection_settings(f, app, chunks[1]);
    database_list::render_database_list(f, app, chunks[2]);

    let state = if app.is_connected() { "connected" } else { "disconnected" };
    let status = format!(
        " {} | {} | q quit, Tab focus, m/right-click menu, b backup, R restore",
        app.status, state
    );
    let status_bar = Paragraph::new(status).style(Style::default().fg(Color::White).bg(Color::Blue));
    f.render_widget(status_bar, chunks[3]);

    if app.popup_state != PopupState::Hidden {
        debug!("Rendering popup: {:?}", app.popup_state);
        popups::render_popups(f, app);
    }
}
