use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use humansize::{format_size, DECIMAL};
use log::{debug, info, warn};
use ratatui::backend::Backend;
use ratatui::Terminal;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::error::KeeperError;
use crate::jobs::{self, JobEvent, JobKind, JobRequest};
use crate::mysql::{self, MySqlSession};
use crate::tools::{MysqlTool, ToolLocator, ToolReport};
use crate::ui::database_browser::DatabaseBrowser;
use crate::ui::models::{ConnectionConfig, ContextAction, FocusField, InputMode, PopupState};

/// Application controller
///
/// Owns the one MySQL session, the database list, the popup state machine
/// and the channel background jobs report on.
pub struct KeeperApp {
    pub conn_config: ConnectionConfig,
    pub session: Option<MySqlSession>,
    pub browser: DatabaseBrowser,
    pub locator: ToolLocator,
    pub popup_state: PopupState,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub focus: FocusField,
    pub status: String,
    pub active_job: Option<JobRequest>,
    pub should_quit: bool,
    job_tx: UnboundedSender<JobEvent>,
    job_rx: UnboundedReceiver<JobEvent>,
}

impl KeeperApp {
    pub fn new(conn_config: ConnectionConfig, locator: ToolLocator) -> Self {
        let (job_tx, job_rx) = unbounded_channel();
        KeeperApp {
            conn_config,
            session: None,
            browser: DatabaseBrowser::new(),
            locator,
            popup_state: PopupState::Hidden,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            focus: FocusField::Host,
            status: "Ready".to_string(),
            active_job: None,
            should_quit: false,
            job_tx,
            job_rx,
        }
    }

    /// Run the application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        crate::ui::app::run_app(terminal, self).await
    }

    pub async fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        crate::ui::key_handler::handle_key_event(self, key).await
    }

    pub async fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<()> {
        crate::ui::key_handler::handle_mouse_event(self, mouse).await
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// Open the session and load the database list
    ///
    /// Refused while a session is live; disconnect first to switch servers.
    pub async fn connect(&mut self) {
        if let Some(session) = &self.session {
            self.status = format!("Already connected to {}", session.server());
            return;
        }

        self.status = format!("Connecting to {}...", self.conn_config.host);
        match mysql::connect(&self.conn_config).await {
            Ok(session) => {
                self.status = format!("Connected to MySQL server: {}", self.conn_config.host);
                self.session = Some(session);
                self.focus = FocusField::DatabaseList;
                self.load_databases().await;
            }
            Err(e) => {
                warn!("Connection failed: {}", e);
                self.popup_state = PopupState::Error {
                    title: "Connection error".to_string(),
                    message: e.to_string(),
                };
                self.status = "Connection failed".to_string();
            }
        }
    }

    /// Re-run `SHOW DATABASES` on the live session
    pub async fn load_databases(&mut self) {
        let Some(session) = self.session.as_mut() else {
            self.status = "Not connected".to_string();
            return;
        };
        let result = mysql::list_databases(session).await;
        self.apply_database_list(result);
    }

    /// Show a listing result; a failure keeps the session open
    pub fn apply_database_list(&mut self, result: crate::error::Result<Vec<String>>) {
        match result {
            Ok(databases) => {
                info!("Loaded {} databases", databases.len());
                self.browser.set_databases(databases);
            }
            Err(e) => {
                warn!("Listing databases failed: {}", e);
                self.popup_state = PopupState::Error {
                    title: "Error".to_string(),
                    message: e.to_string(),
                };
            }
        }
    }

    /// Close the session if there is one; safe to call repeatedly
    pub async fn disconnect(&mut self) {
        if let Some(session) = self.session.take() {
            let server = session.server();
            if let Err(e) = session.close().await {
                warn!("Error while closing connection to {}: {}", server, e);
            }
            info!("Disconnected from {}", server);
            self.browser.clear();
            self.status = format!("Disconnected from {}", server);
        }
    }

    /// Select a database row and report it in the status bar
    pub fn select_database(&mut self, index: usize) {
        if let Some(name) = self.browser.select(index) {
            self.status = format!("Selected database: {}", name);
        }
    }

    pub fn select_next(&mut self) {
        if let Some(name) = self.browser.next() {
            self.status = format!("Selected database: {}", name);
        }
    }

    pub fn select_previous(&mut self) {
        if let Some(name) = self.browser.previous() {
            self.status = format!("Selected database: {}", name);
        }
    }

    fn require_selection(&mut self) -> Option<String> {
        let selected = self.browser.selected_database().map(str::to_string);
        if selected.is_none() {
            self.popup_state = PopupState::Warning("Select a database first".to_string());
        }
        selected
    }

    pub fn open_context_menu(&mut self) {
        if let Some(database) = self.require_selection() {
            self.popup_state = PopupState::ContextMenu { database, selected: ContextAction::Backup };
        }
    }

    /// Start the backup or restore flow for the selected database
    pub fn begin(&mut self, action: ContextAction) {
        if self.active_job.is_some() {
            self.status = "Wait for the running job to finish".to_string();
            return;
        }
        let Some(database) = self.require_selection() else {
            return;
        };
        let input = match action {
            ContextAction::Backup => format!("{}.sql", database),
            ContextAction::Restore => String::new(),
        };
        debug!("Opening {} prompt for {}", action.label(), database);
        self.popup_state = PopupState::PathPrompt { kind: action.job_kind(), database, input };
    }

    /// Dismiss a file prompt; nothing is written and the status stays as it was
    pub fn cancel_prompt(&mut self) {
        debug!("File prompt cancelled");
        self.popup_state = PopupState::Hidden;
    }

    /// Accept the path typed into the file prompt
    pub fn submit_prompt(&mut self) {
        if !matches!(self.popup_state, PopupState::PathPrompt { .. }) {
            return;
        }
        let PopupState::PathPrompt { kind, database, input } = std::mem::replace(&mut self.popup_state, PopupState::Hidden) else {
            return;
        };
        let trimmed = input.trim();
        if trimmed.is_empty() {
            // An empty path is the same as dismissing the dialog
            return;
        }
        let path = PathBuf::from(trimmed);
        match kind {
            JobKind::Backup => self.start_job(JobKind::Backup, database, path),
            JobKind::Restore => {
                self.popup_state = PopupState::ConfirmRestore { database, path };
            }
        }
    }

    /// Answer the overwrite warning; anything but yes leaves the database alone
    pub fn answer_restore_confirmation(&mut self, confirmed: bool) {
        if !matches!(self.popup_state, PopupState::ConfirmRestore { .. }) {
            return;
        }
        let PopupState::ConfirmRestore { database, path } = std::mem::replace(&mut self.popup_state, PopupState::Hidden) else {
            return;
        };
        if confirmed {
            self.start_job(JobKind::Restore, database, path);
        } else {
            debug!("Restore of {} declined", database);
        }
    }

    fn start_job(&mut self, kind: JobKind, database: String, path: PathBuf) {
        let request = JobRequest {
            kind,
            database,
            path,
            config: self.conn_config.clone(),
        };
        info!("Starting {} of {} with {}", kind, request.database, request.path.display());
        jobs::spawn_job(self.locator.clone(), request.clone(), self.job_tx.clone());
        self.popup_state = PopupState::Running(request.clone());
        self.active_job = Some(request);
    }

    /// Drain finished jobs without blocking; returns true if any finished
    pub fn poll_jobs(&mut self) -> bool {
        let mut finished = false;
        while let Ok(event) = self.job_rx.try_recv() {
            self.finish_job(event);
            finished = true;
        }
        finished
    }

    /// Wait for the running job, if any, and apply its outcome
    pub async fn wait_for_job(&mut self) {
        if self.active_job.is_none() {
            return;
        }
        if let Some(event) = self.job_rx.recv().await {
            self.finish_job(event);
        }
    }

    fn finish_job(&mut self, event: JobEvent) {
        let JobEvent { request, result } = event;
        self.active_job = None;
        let path = request.path.display().to_string();
        match (request.kind, result) {
            (JobKind::Backup, Ok(bytes)) => {
                self.popup_state = PopupState::Success(format!(
                    "Database {} was backed up to:\n{}\n({})",
                    request.database,
                    path,
                    format_size(bytes, DECIMAL)
                ));
                self.status = format!("Backup complete: {}", path);
            }
            (JobKind::Restore, Ok(_)) => {
                self.popup_state = PopupState::Success(format!(
                    "Database {} was restored from {}",
                    request.database, path
                ));
                self.status = format!("Restore complete: {}", path);
            }
            (kind, Err(e)) => {
                warn!("{} of {} failed: {}", kind, request.database, e);
                let title = match &e {
                    KeeperError::ToolNotFound { .. } => "Tool not found".to_string(),
                    _ => format!("{} failed", kind),
                };
                self.popup_state = PopupState::Error { title, message: e.to_string() };
                self.status = format!("{} failed", kind);
            }
        }
    }

    /// Resolve both tools and show where they came from and their versions
    pub fn show_tool_versions(&mut self) {
        let lines: Vec<String> = MysqlTool::all()
            .iter()
            .map(|tool| ToolReport::probe(&self.locator, *tool).to_string())
            .collect();
        self.popup_state = PopupState::Info {
            title: "MySQL tools".to_string(),
            message: lines.join("\n"),
        };
    }
}
