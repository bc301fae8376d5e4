use log::{debug, info};
use std::time::Duration;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::backend::Backend;
use ratatui::Terminal;

use crate::ui::keeper::KeeperApp;
use crate::ui::models::InputMode;

/// Leave the TUI, stop the process and re-enter the TUI on resume
#[cfg(unix)]
fn suspend() -> Result<()> {
    use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
    use crossterm::execute;
    use std::io::stdout;
    use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};

    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    unsafe {
        libc::raise(libc::SIGTSTP);
    }
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    Ok(())
}

#[cfg(not(unix))]
fn suspend() -> Result<()> {
    Ok(())
}

/// Run the TUI event loop until the user quits
pub async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut KeeperApp) -> Result<()> {
    loop {
        if app.poll_jobs() {
            debug!("Background job finished");
        }

        terminal.draw(|f| crate::ui::renderer::ui(f, app))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.input_mode == InputMode::Normal
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('z')
                    {
                        suspend()?;
                        terminal.clear()?;
                        continue;
                    }
                    app.handle_key_event(key).await?;
                }
                Event::Mouse(mouse) => app.handle_mouse_event(mouse).await?,
                _ => {}
            }
        }
    }

    app.disconnect().await;
    info!("Leaving the terminal UI");
    Ok(())
}
