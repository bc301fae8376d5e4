use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use log::debug;
use crate::ui::keeper::KeeperApp;
use crate::ui::models::{ConnectionConfig, FocusField, InputMode};

/// Value shown for one connection field
///
/// The field being edited shows the input buffer; the password is masked
/// everywhere else.
pub fn field_display(app: &KeeperApp, field: FocusField) -> String {
    let editing = app.focus == field && app.input_mode == InputMode::Editing;
    match field {
        FocusField::Password => app.conn_config.password_display(editing, &app.input_buffer),
        _ if editing => app.input_buffer.clone(),
        _ => app.conn_config.get_field_value(field),
    }
}

/// Render the connection panel
///
/// # Arguments
///
/// * `f` - A mutable reference to the frame for rendering
/// * `app` - A reference to the application state
/// * `area` - The area in which to render the component
pub fn render_connection_settings(f: &mut Frame, app: &KeeperApp, area: Rect) {
    debug!("Rendering connection settings with focus: {:?}, input mode: {:?}", app.focus, app.input_mode);

    let title = if app.is_connected() { " MySQL Server (connected) " } else { " MySQL Server " };
    let border_style = if ConnectionConfig::contains_field(app.focus) {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let inner_area = block.inner(area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Fields
            Constraint::Length(1), // Help text
        ])
        .split(inner_area);

    let rows: Vec<Row> = ConnectionConfig::focus_fields()
        .iter()
        .map(|field| {
            let value_style = if app.focus == *field {
                if app.input_mode == InputMode::Editing {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
                }
            } else {
                Style::default().fg(Color::White)
            };
            Row::new(vec![
                Cell::from(field.to_string()).style(Style::default().fg(Color::Blue)),
                Cell::from(field_display(app, *field)).style(value_style),
            ])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Percentage(20), Constraint::Percentage(80)]).column_spacing(1);

    f.render_widget(block, area);
    f.render_widget(table, chunks[0]);

    let key = Style::default().fg(Color::Yellow);
    let help = if app.is_connected() {
        Line::from(vec![
            Span::styled("[d]", key),
            Span::raw(" Disconnect "),
            Span::styled("[r]", key),
            Span::raw(" Reload "),
            Span::styled("[v]", key),
            Span::raw(" Tools "),
        ])
    } else {
        Line::from(vec![
            Span::styled("↑↓", key),
            Span::raw(" Navigate "),
            Span::styled("Enter", key),
            Span::raw(" Edit "),
            Span::styled("[c]", key),
            Span::raw(" Connect "),
            Span::styled("[v]", key),
            Span::raw(" Tools "),
        ])
    };
    f.render_widget(Paragraph::new(help).alignment(Alignment::Left), chunks[1]);
}
