use std::fs::File;
use std::path::Path;
use std::process::Stdio;
use std::sync::OnceLock;

use log::{debug, error, info};
use regex::Regex;

use crate::error::{KeeperError, Result};
use crate::tools::ResolvedTool;
use crate::ui::models::ConnectionConfig;

/// Arguments shared by mysqldump and mysql: host, port, user and password
///
/// The password flag is left out when the password is empty; a bare `-p`
/// makes both tools prompt on the terminal.
fn connection_args(config: &ConnectionConfig) -> Result<Vec<String>> {
    let port = config.parse_port()?;
    let mut args = vec![
        format!("-h{}", config.host),
        format!("-P{}", port),
        format!("-u{}", config.user),
    ];
    if !config.password.is_empty() {
        args.push(format!("-p{}", config.password));
    }
    Ok(args)
}

/// Full mysqldump argument list for one database, including stored
/// routines, triggers and events
pub fn dump_args(config: &ConnectionConfig, database: &str) -> Result<Vec<String>> {
    let mut args = connection_args(config)?;
    args.extend(["--routines", "--triggers", "--events"].map(String::from));
    args.push(database.to_string());
    Ok(args)
}

/// mysql client argument list that replays stdin into `database`
pub fn restore_args(config: &ConnectionConfig, database: &str) -> Result<Vec<String>> {
    let mut args = connection_args(config)?;
    args.push(database.to_string());
    Ok(args)
}

/// Render a command line for logging with any `-p<password>` masked
pub fn redact_command(program: &str, args: &[String]) -> String {
    static PASSWORD: OnceLock<Regex> = OnceLock::new();
    let re = PASSWORD.get_or_init(|| Regex::new(r"^-p.+").expect("static regex"));
    let masked: Vec<_> = args.iter().map(|arg| re.replace(arg, "-p****")).collect();
    format!("{} {}", program, masked.join(" "))
}

/// Dump a database into `destination` with mysqldump
///
/// The tool's stdout goes straight into the file, which is created or
/// truncated first. A non-zero exit leaves whatever was written in place;
/// the caller should treat that file as invalid.
///
/// # Returns
///
/// The size in bytes of the written dump
pub fn dump_database(
    tool: &ResolvedTool,
    database: &str,
    destination: &Path,
    config: &ConnectionConfig,
) -> Result<u64> {
    let args = dump_args(config, database)?;
    debug!("Executing {}", redact_command(&tool.path.display().to_string(), &args));

    let output_file = File::create(destination).map_err(|source| KeeperError::File {
        action: "create",
        path: destination.to_path_buf(),
        source,
    })?;
    let child = tool
        .command()
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::from(output_file))
        .stderr(Stdio::piped())
        .spawn()?;
    let output = child.wait_with_output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        error!("mysqldump failed for {}: {}", database, stderr);
        return Err(KeeperError::Process {
            tool: tool.tool.program().to_string(),
            code: output.status.code(),
            stderr,
        });
    }

    let bytes = std::fs::metadata(destination)?.len();
    info!("Dumped database {} to {} ({} bytes)", database, destination.display(), bytes);
    Ok(bytes)
}

/// Replay a dump file into a database with the mysql client
///
/// There is no rollback: if the client fails halfway the database keeps
/// whatever statements already ran.
///
/// # Returns
///
/// The size in bytes of the replayed file
pub fn restore_database(
    tool: &ResolvedTool,
    database: &str,
    source: &Path,
    config: &ConnectionConfig,
) -> Result<u64> {
    let args = restore_args(config, database)?;
    let input_file = File::open(source).map_err(|e| KeeperError::File {
        action: "open",
        path: source.to_path_buf(),
        source: e,
    })?;
    let bytes = input_file.metadata()?.len();
    debug!("Executing {} < {}", redact_command(&tool.path.display().to_string(), &args), source.display());

    let child = tool
        .command()
        .args(&args)
        .stdin(Stdio::from(input_file))
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()?;
    let output = child.wait_with_output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        error!("mysql restore failed for {}: {}", database, stderr);
        return Err(KeeperError::Process {
            tool: tool.tool.program().to_string(),
            code: output.status.code(),
            stderr,
        });
    }

    info!("Restored database {} from {}", database, source.display());
    Ok(bytes)
}
