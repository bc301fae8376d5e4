// Background execution of backup and restore runs.
//
// The external tools can take minutes, so they never run on the event loop.
// A job is handed to tokio's blocking pool and reports back over a channel
// that the UI drains between frames.

use std::fmt;
use std::path::PathBuf;

use log::{debug, error, warn};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::backup;
use crate::error::{KeeperError, Result};
use crate::tools::{MysqlTool, ToolLocator};
use crate::ui::models::ConnectionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Backup,
    Restore,
}

impl JobKind {
    /// The external tool this kind of job drives
    pub fn tool(&self) -> MysqlTool {
        match self {
            JobKind::Backup => MysqlTool::Dump,
            JobKind::Restore => MysqlTool::Client,
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobKind::Backup => write!(f, "Backup"),
            JobKind::Restore => write!(f, "Restore"),
        }
    }
}

/// Everything a worker needs to run one dump or restore
#[derive(Debug, Clone, PartialEq)]
pub struct JobRequest {
    pub kind: JobKind,
    pub database: String,
    pub path: PathBuf,
    pub config: ConnectionConfig,
}

/// Sent by a worker when its job has finished, successfully or not
#[derive(Debug)]
pub struct JobEvent {
    pub request: JobRequest,
    /// Bytes written (backup) or replayed (restore)
    pub result: Result<u64>,
}

/// Resolve the tool and run the job on the current thread
pub fn run_job(locator: &ToolLocator, request: &JobRequest) -> Result<u64> {
    let tool = locator.locate(request.kind.tool())?;
    match request.kind {
        JobKind::Backup => backup::dump_database(&tool, &request.database, &request.path, &request.config),
        JobKind::Restore => backup::restore_database(&tool, &request.database, &request.path, &request.config),
    }
}

/// Run a job on the blocking pool and report the outcome on `tx`
pub fn spawn_job(locator: ToolLocator, request: JobRequest, tx: UnboundedSender<JobEvent>) -> JoinHandle<()> {
    spawn_work(request, tx, move |request| run_job(&locator, request))
}

/// Run `work` on the blocking pool and always send exactly one `JobEvent`
///
/// A worker that panics is reported as `KeeperError::Worker` so the UI never
/// waits on a job that will not finish.
fn spawn_work<F>(request: JobRequest, tx: UnboundedSender<JobEvent>, work: F) -> JoinHandle<()>
where
    F: FnOnce(&JobRequest) -> Result<u64> + Send + 'static,
{
    debug!("Spawning {} job for {} ({})", request.kind, request.database, request.path.display());
    let worker_request = request.clone();
    let worker = tokio::task::spawn_blocking(move || work(&worker_request));
    tokio::spawn(async move {
        let result = match worker.await {
            Ok(result) => result,
            Err(e) => {
                error!("{} job for {} died: {}", request.kind, request.database, e);
                Err(KeeperError::Worker(e.to_string()))
            }
        };
        if tx.send(JobEvent { request, result }).is_err() {
            warn!("Job finished after the UI went away");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_kinds_map_to_tools() {
        assert_eq!(JobKind::Backup.tool(), MysqlTool::Dump);
        assert_eq!(JobKind::Restore.tool(), MysqlTool::Client);
    }

    #[tokio::test]
    async fn missing_tool_reports_through_channel() {
        let locator = ToolLocator::new("/nonexistent")
            .with_executable_dir(None)
            .with_search_path(None);
        let request = JobRequest {
            kind: JobKind::Backup,
            database: "app_db".into(),
            path: std::env::temp_dir().join("sqlkeeper-never-written.sql"),
            config: ConnectionConfig::default(),
        };
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        spawn_job(locator, request.clone(), tx).await.unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.request, request);
        assert!(matches!(event.result, Err(KeeperError::ToolNotFound { .. })));
        assert!(!request.path.exists());
    }

    #[tokio::test]
    async fn panicking_worker_still_reports() {
        let request = JobRequest {
            kind: JobKind::Restore,
            database: "app_db".into(),
            path: PathBuf::from("app_db.sql"),
            config: ConnectionConfig::default(),
        };
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        spawn_work(request.clone(), tx, |_| panic!("worker blew up")).await.unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.request, request);
        assert!(matches!(event.result, Err(KeeperError::Worker(_))));
    }
}
