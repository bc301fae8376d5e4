use std::io;

use anyhow::Result;
use clap::Parser;
use crossterm::{execute, terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen}};
use humansize::{format_size, DECIMAL};
use log::{error, info, debug};
use log4rs::{append::file::FileAppender, config::{Appender, Config as LogConfig, Root}, encode::pattern::PatternEncoder};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use sqlkeeper::cli::{self, Cli, Commands};
use sqlkeeper::config;
use sqlkeeper::error::KeeperError;
use sqlkeeper::jobs::{self, JobKind, JobRequest};
use sqlkeeper::mysql;
use sqlkeeper::tools::{MysqlTool, ToolReport};
use sqlkeeper::ui::keeper::KeeperApp;

fn init_logging(cli: &Cli) -> Result<()> {
    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d(%Y-%m-%d %H:%M:%S)} {l} {t} - {m}{n}")))
        .build(&cli.log_file)?;

    let log_config = LogConfig::builder()
        .appender(Appender::builder().build("logfile", Box::new(logfile)))
        .build(Root::builder().appender("logfile").build(cli.log_level))?;

    log4rs::init_config(log_config)?;
    Ok(())
}

/// Run a backup or restore to completion on the blocking pool
async fn run_job(cli: &Cli, kind: JobKind, database: String, path: std::path::PathBuf) -> sqlkeeper::error::Result<u64> {
    let locator = cli.locator();
    let request = JobRequest {
        kind,
        database,
        path,
        config: cli.connection_config(),
    };
    tokio::task::spawn_blocking(move || jobs::run_job(&locator, &request))
        .await
        .map_err(|e| KeeperError::Worker(e.to_string()))?
}

async fn list(cli: &Cli, json: bool) -> Result<()> {
    let mut session = mysql::connect(&cli.connection_config()).await?;
    let databases = mysql::list_databases(&mut session).await;
    session.close().await?;
    let databases = databases?;

    if json {
        println!("{}", serde_json::to_string_pretty(&databases)?);
    } else {
        for name in &databases {
            println!("{}", name);
        }
    }
    Ok(())
}

fn tools(cli: &Cli, json: bool) -> Result<()> {
    let locator = cli.locator();
    let reports: Vec<ToolReport> = MysqlTool::all()
        .iter()
        .map(|tool| ToolReport::probe(&locator, *tool))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            println!("{}", report);
        }
    }
    Ok(())
}

async fn browse(cli: &Cli) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, crossterm::event::EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = KeeperApp::new(cli.connection_config(), cli.locator());
    let res = app.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, crossterm::event::DisableMouseCapture)?;
    terminal.show_cursor()?;
    res
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file before clap reads them
    config::load_env();

    let cli: Cli = Cli::parse();
    init_logging(&cli)?;
    info!("Starting sqlkeeper");
    debug!("Connection settings: {:?}", cli.connection_config());

    match cli.command() {
        Commands::List { json } => list(&cli, json).await?,
        Commands::Dump { name, output } => {
            info!("Dumping database '{}' to '{}'", name, output.display());
            let bytes = run_job(&cli, JobKind::Backup, name.clone(), output.clone()).await?;
            println!("Database {} was backed up to:\n{}\n({})", name, output.display(), format_size(bytes, DECIMAL));
        }
        Commands::Restore { name, input, yes } => {
            if !yes {
                let stdin = io::stdin();
                let mut stdout = io::stdout();
                match cli::confirm_restore(&mut stdin.lock(), &mut stdout, &name, &input) {
                    Ok(()) => {}
                    Err(e) if e.is_cancelled() => {
                        println!("Restore cancelled");
                        return Ok(());
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            info!("Restoring database '{}' from '{}'", name, input.display());
            if let Err(e) = run_job(&cli, JobKind::Restore, name.clone(), input.clone()).await {
                error!("Restore of {} failed: {}", name, e);
                return Err(e.into());
            }
            println!("Database {} was restored from {}", name, input.display());
        }
        Commands::Tools { json } => tools(&cli, json)?,
        Commands::Browse => browse(&cli).await?,
    }

    Ok(())
}
