use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::LevelFilter;

use crate::config;
use crate::error::{KeeperError, Result};
use crate::tools::ToolLocator;
use crate::ui::models::ConnectionConfig;

/// Command-line options for sqlkeeper
#[derive(Debug, Parser)]
#[command(name = "sqlkeeper", version)]
#[command(about = "MySQL database backup and restore tool")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short = 'H', long, default_value = "localhost", env = "MYSQL_HOST", help = "MySQL Host")]
    pub host: String,

    #[arg(short, long, default_value = "3306", env = "MYSQL_PORT", help = "MySQL Port")]
    pub port: String,

    #[arg(short, long, default_value = "root", env = "MYSQL_USER", help = "MySQL User")]
    pub user: String,

    #[arg(short = 'P', long, default_value = "", env = "MYSQL_PASSWORD", hide_env_values = true, help = "MySQL Password")]
    pub password: String,

    /// Directory holding bundled tools under mysql/bin
    #[arg(long, env = "SQLKEEPER_RESOURCE_DIR")]
    pub resource_dir: Option<PathBuf>,

    #[arg(long, default_value = "sqlkeeper.log", help = "Log file path")]
    pub log_file: PathBuf,

    #[arg(long, default_value = "debug", value_parser = parse_log_level, help = "Log level: off, error, warn, info, debug, trace")]
    pub log_level: LevelFilter,
}

#[derive(Debug, Clone, Subcommand, PartialEq)]
pub enum Commands {
    #[command(about = "List user databases")]
    List {
        #[arg(long, help = "Print the names as a JSON array")]
        json: bool,
    },

    #[command(about = "Dump a database to a file with mysqldump")]
    Dump {
        #[arg(help = "Name of the database to dump")]
        name: String,

        #[arg(help = "Output file path")]
        output: PathBuf,
    },

    #[command(about = "Restore a database from a dump file with mysql")]
    Restore {
        #[arg(help = "Name of the database to restore into")]
        name: String,

        #[arg(help = "Input dump file path")]
        input: PathBuf,

        #[arg(long, help = "Skip the overwrite confirmation")]
        yes: bool,
    },

    #[command(about = "Show where mysqldump and mysql are found and their versions")]
    Tools {
        #[arg(long, help = "Print the report as JSON")]
        json: bool,
    },

    /// Browse databases using the TUI
    Browse,
}

fn parse_log_level(value: &str) -> std::result::Result<LevelFilter, String> {
    value.parse().map_err(|_| format!("unknown log level '{}'", value))
}

impl Cli {
    /// The subcommand to run; the TUI when none was given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Browse)
    }

    pub fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            host: self.host.clone(),
            port: self.port.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
        }
    }

    pub fn locator(&self) -> ToolLocator {
        let resource_dir = self.resource_dir.clone().unwrap_or_else(config::default_resource_dir);
        ToolLocator::new(resource_dir)
    }
}

/// Ask before overwriting a database
///
/// Only `y` or `yes` (any case) confirms; anything else, including end of
/// input, is `Cancelled`.
pub fn confirm_restore<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    database: &str,
    path: &std::path::Path,
) -> Result<()> {
    write!(
        output,
        "Restore database {} from backup file {}? This will overwrite existing data! (y/n) ",
        database,
        path.display()
    )?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Ok(()),
        _ => Err(KeeperError::Cancelled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::Path;

    #[test]
    fn test_defaults_when_no_flags_given() {
        // Only this test reads the connection variables
        for var in ["MYSQL_HOST", "MYSQL_PORT", "MYSQL_USER", "MYSQL_PASSWORD"] {
            std::env::remove_var(var);
        }
        let cli = Cli::parse_from(["sqlkeeper"]);
        assert_eq!(cli.command(), Commands::Browse);
        let config = cli.connection_config();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, "3306");
        assert_eq!(config.user, "root");
        assert_eq!(config.password, "");
        assert_eq!(cli.log_file, PathBuf::from("sqlkeeper.log"));
        assert_eq!(cli.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_flags_override_connection() {
        let cli = Cli::parse_from([
            "sqlkeeper", "-H", "db.internal", "-p", "3307", "-u", "backup", "-P", "s3cret", "list", "--json",
        ]);
        assert_eq!(cli.command(), Commands::List { json: true });
        let config = cli.connection_config();
        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, "3307");
        assert_eq!(config.user, "backup");
        assert_eq!(config.password, "s3cret");
    }

    #[test]
    fn test_restore_subcommand() {
        let cli = Cli::parse_from(["sqlkeeper", "restore", "app_db", "/tmp/app_db.sql", "--yes"]);
        assert_eq!(
            cli.command(),
            Commands::Restore {
                name: "app_db".to_string(),
                input: PathBuf::from("/tmp/app_db.sql"),
                yes: true,
            }
        );
    }

    #[test]
    fn test_resource_dir_flag_feeds_locator() {
        let cli = Cli::parse_from(["sqlkeeper", "--resource-dir", "/opt/keeper", "tools"]);
        assert_eq!(cli.locator().resource_dir(), Path::new("/opt/keeper"));
    }

    #[test]
    fn test_log_level_parses() {
        let cli = Cli::parse_from(["sqlkeeper", "--log-level", "warn", "tools"]);
        assert_eq!(cli.log_level, LevelFilter::Warn);
    }

    #[test]
    fn test_confirm_restore_accepts_yes() {
        let mut input = Cursor::new("Y\n");
        let mut output = Vec::new();
        confirm_restore(&mut input, &mut output, "app_db", Path::new("app_db.sql")).unwrap();
        let prompt = String::from_utf8(output).unwrap();
        assert!(prompt.contains("Restore database app_db from backup file app_db.sql?"));
    }

    #[test]
    fn test_confirm_restore_declines_anything_else() {
        for answer in ["n\n", "\n", "maybe\n", ""] {
            let mut input = Cursor::new(answer);
            let mut output = Vec::new();
            let err = confirm_restore(&mut input, &mut output, "app_db", Path::new("app_db.sql")).unwrap_err();
            assert!(err.is_cancelled());
        }
    }
}
