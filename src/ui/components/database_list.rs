use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use log::debug;

use crate::ui::keeper::KeeperApp;
use crate::ui::models::FocusField;

/// Render the database list
///
/// Records the drawn area on the browser so mouse clicks can be mapped back
/// to rows.
pub fn render_database_list(f: &mut Frame, app: &mut KeeperApp, area: Rect) {
    debug!("Rendering database list, count: {}", app.browser.databases.len());
    app.browser.area = Some(area);

    let border_style = if app.focus == FocusField::DatabaseList {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let block = Block::default()
        .title(" Databases ")
        .borders(Borders::ALL)
        .border_style(border_style);

    if app.browser.databases.is_empty() {
        let hint = if app.is_connected() {
            "No user databases on this server"
        } else {
            "Not connected. Press [c] to connect."
        };
        let paragraph = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .browser
        .databases
        .iter()
        .map(|name| ListItem::new(name.as_str()))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, &mut app.browser.list_state);
}
