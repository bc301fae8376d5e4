use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::jobs::JobKind;
use crate::ui::keeper::KeeperApp;
use crate::ui::layouts::centered_rect;
use crate::ui::models::{ContextAction, PopupState};

/// Title of the file prompt for each job kind
pub fn prompt_title(kind: JobKind) -> &'static str {
    match kind {
        JobKind::Backup => "Save backup file",
        JobKind::Restore => "Select backup file",
    }
}

/// Rows a popup needs to show `lines` wrapped to `inner_width`, borders included
pub fn popup_height(lines: &[Line], inner_width: u16) -> u16 {
    let width = usize::from(inner_width.max(1));
    let rows: usize = lines.iter().map(|line| line.width().max(1).div_ceil(width)).sum();
    u16::try_from(rows).unwrap_or(u16::MAX).saturating_add(2)
}

fn render_box(f: &mut Frame, title: &str, lines: Vec<Line>, border: Style) {
    let screen = f.size();
    let inner_width = centered_rect(60, screen.height, screen).width.saturating_sub(2);
    // centered_rect clamps the height to the screen
    let area = centered_rect(60, popup_height(&lines, inner_width), screen);
    f.render_widget(Clear, area);
    let popup = Paragraph::new(lines)
        .block(Block::default().title(title.to_string()).borders(Borders::ALL).border_style(border))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });
    f.render_widget(popup, area);
}

fn text_lines(message: &str) -> Vec<Line<'static>> {
    message.lines().map(|l| Line::from(l.to_string())).collect()
}

fn dismiss_hint() -> Line<'static> {
    Line::from(Span::styled("Press Enter or Esc to close", Style::default().fg(Color::DarkGray)))
}

/// Render popups based on the current popup state
pub fn render_popups(f: &mut Frame, app: &KeeperApp) {
    match &app.popup_state {
        PopupState::ContextMenu { database, selected } => {
            let mut lines = vec![Line::from(Span::raw(database.clone())), Line::default()];
            for action in ContextAction::all() {
                let style = if action == *selected {
                    Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                lines.push(Line::from(Span::styled(format!(" {} ", action.label()), style)));
            }
            render_box(f, "Database", lines, Style::default().fg(Color::Yellow));
        }
        PopupState::PathPrompt { kind, database, input } => {
            let lines = vec![
                Line::from(format!("{} for {}", prompt_title(*kind), database)),
                Line::default(),
                Line::from(Span::styled(format!("{}_", input), Style::default().fg(Color::Yellow))),
                Line::default(),
                Line::from("Enter to accept, Esc to cancel"),
            ];
            render_box(f, prompt_title(*kind), lines, Style::default());
        }
        PopupState::ConfirmRestore { database, path } => {
            let lines = vec![
                Line::from(format!("Restore database {} from backup file", database)),
                Line::from(path.display().to_string()),
                Line::default(),
                Line::from(Span::styled(
                    "This will overwrite existing data!",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::default(),
                Line::from("Press 'y' to confirm, 'n' to cancel"),
            ];
            render_box(f, "Confirm Restore", lines, Style::default().fg(Color::Red));
        }
        PopupState::Running(request) => {
            let verb = match request.kind {
                JobKind::Backup => "Backing up",
                JobKind::Restore => "Restoring",
            };
            let lines = vec![
                Line::from(format!("{} {}...", verb, request.database)),
                Line::from(request.path.display().to_string()),
            ];
            render_box(f, &request.kind.to_string(), lines, Style::default().fg(Color::Cyan));
        }
        PopupState::Info { title, message } => {
            let mut lines = text_lines(message);
            lines.push(Line::default());
            lines.push(dismiss_hint());
            render_box(f, title, lines, Style::default());
        }
        PopupState::Warning(message) => {
            let mut lines = text_lines(message);
            lines.push(Line::default());
            lines.push(dismiss_hint());
            render_box(f, "Warning", lines, Style::default().fg(Color::Yellow));
        }
        PopupState::Error { title, message } => {
            let mut lines = text_lines(message);
            lines.push(Line::default());
            lines.push(dismiss_hint());
            render_box(f, title, lines, Style::default().fg(Color::Red));
        }
        PopupState::Success(message) => {
            let mut lines = text_lines(message);
            lines.push(Line::default());
            lines.push(dismiss_hint());
            render_box(f, "Success", lines, Style::default().fg(Color::Green));
        }
        PopupState::Hidden => {}
    }
}
