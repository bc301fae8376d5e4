// This module contains key and mouse handling for the sqlkeeper UI.
// Events go to the open popup first, then to the field being edited, then
// to the normal-mode bindings.

use crate::ui::keeper::KeeperApp;
use crate::ui::models::{ConnectionConfig, ContextAction, FocusField, InputMode, PopupState};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use log::debug;

/// Route one key press
pub async fn handle_key_event(app: &mut KeeperApp, key: KeyEvent) -> Result<()> {
    if app.popup_state != PopupState::Hidden {
        return handle_popup_events(app, key).await;
    }
    if app.input_mode == InputMode::Editing {
        return handle_editing_mode(app, key).await;
    }
    handle_normal_mode(app, key).await
}

/// Handle popup key events
///
/// # Arguments
///
/// * `app` - A mutable reference to the KeeperApp
/// * `key` - The key event to process
pub async fn handle_popup_events(app: &mut KeeperApp, key: KeyEvent) -> Result<()> {
    debug!("Handling popup key event: {:?}", key);

    match &mut app.popup_state {
        PopupState::ContextMenu { selected, .. } => match key.code {
            KeyCode::Up | KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('k') => {
                *selected = selected.toggled();
            }
            KeyCode::Enter => {
                let action = *selected;
                app.popup_state = PopupState::Hidden;
                app.begin(action);
            }
            KeyCode::Char('b') => {
                app.popup_state = PopupState::Hidden;
                app.begin(ContextAction::Backup);
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                app.popup_state = PopupState::Hidden;
                app.begin(ContextAction::Restore);
            }
            KeyCode::Esc | KeyCode::Char('q') => app.popup_state = PopupState::Hidden,
            _ => {}
        },
        PopupState::PathPrompt { input, .. } => match key.code {
            KeyCode::Enter => app.submit_prompt(),
            KeyCode::Esc => app.cancel_prompt(),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            _ => {}
        },
        PopupState::ConfirmRestore { .. } => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.answer_restore_confirmation(true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.answer_restore_confirmation(false),
            _ => {}
        },
        // Only the job's completion closes this one
        PopupState::Running(_) => {}
        popup => {
            if popup.is_message() && (key.code == KeyCode::Esc || key.code == KeyCode::Enter) {
                app.popup_state = PopupState::Hidden;
            }
        }
    }

    Ok(())
}

/// Handle editing mode key events
///
/// Enter commits the buffer into the focused connection field, Esc throws it away.
pub async fn handle_editing_mode(app: &mut KeeperApp, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let value = std::mem::take(&mut app.input_buffer);
            app.conn_config.set_field_value(app.focus, value);
            app.input_mode = InputMode::Normal;
            debug!("Updated connection field {}", app.focus);
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.input_buffer.clear();
        }
        KeyCode::Backspace => {
            app.input_buffer.pop();
        }
        KeyCode::Char(c) => app.input_buffer.push(c),
        _ => {}
    }
    Ok(())
}

/// Handle normal mode key events
pub async fn handle_normal_mode(app: &mut KeeperApp, key: KeyEvent) -> Result<()> {
    debug!("Handling normal mode key event: {:?}", key);

    // Letter bindings are plain keys; Ctrl+C quits like q, other chords are ignored
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            request_quit(app);
        }
        return Ok(());
    }

    match key.code {
        KeyCode::Char('q') => request_quit(app),
        KeyCode::Char('c') => app.connect().await,
        KeyCode::Char('d') => app.disconnect().await,
        KeyCode::Char('r') => app.load_databases().await,
        KeyCode::Char('b') => app.begin(ContextAction::Backup),
        KeyCode::Char('R') => app.begin(ContextAction::Restore),
        KeyCode::Char('m') => app.open_context_menu(),
        KeyCode::Char('v') => app.show_tool_versions(),
        KeyCode::Tab => handle_tab_navigation(app),
        KeyCode::Up | KeyCode::Char('k') => handle_up_navigation(app),
        KeyCode::Down | KeyCode::Char('j') => handle_down_navigation(app),
        KeyCode::Enter => handle_enter_key(app),
        _ => {}
    }

    Ok(())
}

/// Quit unless a backup or restore is still running
fn request_quit(app: &mut KeeperApp) {
    if app.active_job.is_some() {
        app.status = "Wait for the running job to finish".to_string();
    } else {
        app.should_quit = true;
    }
}

/// Tab moves between the connection panel and the database list
fn handle_tab_navigation(app: &mut KeeperApp) {
    app.focus = if ConnectionConfig::contains_field(app.focus) {
        FocusField::DatabaseList
    } else {
        FocusField::Host
    };
    debug!("New focus after Tab navigation: {:?}", app.focus);
}

fn handle_up_navigation(app: &mut KeeperApp) {
    if app.focus == FocusField::DatabaseList {
        app.select_previous();
        return;
    }
    let fields = ConnectionConfig::focus_fields();
    let current = fields.iter().position(|&f| f == app.focus).unwrap_or(0);
    let prev = if current == 0 { fields.len() - 1 } else { current - 1 };
    app.focus = fields[prev];
}

fn handle_down_navigation(app: &mut KeeperApp) {
    if app.focus == FocusField::DatabaseList {
        app.select_next();
        return;
    }
    let fields = ConnectionConfig::focus_fields();
    let current = fields.iter().position(|&f| f == app.focus).unwrap_or(0);
    app.focus = fields[(current + 1) % fields.len()];
}

/// Enter edits a connection field or opens the context menu on the list
fn handle_enter_key(app: &mut KeeperApp) {
    if app.focus == FocusField::DatabaseList {
        app.open_context_menu();
        return;
    }
    if app.is_connected() {
        app.status = "Disconnect (d) before changing connection settings".to_string();
        return;
    }
    app.input_mode = InputMode::Editing;
    app.input_buffer = app.conn_config.get_field_value(app.focus);
}

/// Handle mouse events on the database list
///
/// A left click selects the row under the pointer, a right click selects it
/// and opens the Backup/Restore menu.
pub async fn handle_mouse_event(app: &mut KeeperApp, mouse: MouseEvent) -> Result<()> {
    if app.popup_state != PopupState::Hidden || app.input_mode == InputMode::Editing {
        return Ok(());
    }
    let MouseEventKind::Down(button) = mouse.kind else {
        return Ok(());
    };
    let Some(index) = app.browser.row_at(mouse.column, mouse.row) else {
        return Ok(());
    };

    app.focus = FocusField::DatabaseList;
    app.select_database(index);
    if button == MouseButton::Right {
        app.open_context_menu();
    }
    Ok(())
}

