// Locating the MySQL client binaries that do the real dump and load work.
//
// A tool is looked up in three places, always in the same order: a bundled
// resource directory, a mysql/bin directory next to the running executable,
// and finally the directories on PATH. Resolution only inspects the file
// system; it never launches the candidate.

use std::env::consts::EXE_SUFFIX;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info, warn};
use serde::Serialize;

use crate::error::{KeeperError, Result};

/// The two external programs sqlkeeper drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MysqlTool {
    /// `mysqldump`, writes a database as SQL to stdout
    Dump,
    /// `mysql`, replays SQL from stdin
    Client,
}

impl MysqlTool {
    pub fn program(&self) -> &'static str {
        match self {
            MysqlTool::Dump => "mysqldump",
            MysqlTool::Client => "mysql",
        }
    }

    /// Program name with the platform executable suffix (`.exe` on Windows)
    pub fn file_name(&self) -> String {
        format!("{}{}", self.program(), EXE_SUFFIX)
    }

    pub fn all() -> [MysqlTool; 2] {
        [MysqlTool::Dump, MysqlTool::Client]
    }
}

impl fmt::Display for MysqlTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// Where a tool was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolSource {
    Bundled,
    ExecutableDir,
    SearchPath,
}

impl fmt::Display for ToolSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolSource::Bundled => write!(f, "bundled"),
            ToolSource::ExecutableDir => write!(f, "next to executable"),
            ToolSource::SearchPath => write!(f, "PATH"),
        }
    }
}

/// A tool that exists on disk
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTool {
    pub tool: MysqlTool,
    pub path: PathBuf,
    pub source: ToolSource,
}

impl ResolvedTool {
    /// A `Command` for this tool that does not pop up a console window on Windows
    pub fn command(&self) -> Command {
        hidden_command(&self.path)
    }

    /// Run `<tool> --version` and return its first line of output
    pub fn version(&self) -> Result<String> {
        debug!("Probing {} with --version", self.path.display());
        let output = self.command().arg("--version").output()?;
        if !output.status.success() {
            return Err(KeeperError::Process {
                tool: self.tool.program().to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
    }
}

/// Build a `Command` that stays windowless on Windows
pub fn hidden_command(program: &Path) -> Command {
    #[allow(unused_mut)]
    let mut cmd = Command::new(program);
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;
        cmd.creation_flags(CREATE_NO_WINDOW);
    }
    cmd
}

/// Finds MySQL tools in the bundled, executable-adjacent and PATH locations
#[derive(Debug, Clone)]
pub struct ToolLocator {
    resource_dir: PathBuf,
    exe_dir: Option<PathBuf>,
    search_path: Option<OsString>,
}

impl ToolLocator {
    /// Locator for the running process: its own executable directory and
    /// the current `PATH`
    pub fn new(resource_dir: impl Into<PathBuf>) -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        Self {
            resource_dir: resource_dir.into(),
            exe_dir,
            search_path: std::env::var_os("PATH"),
        }
    }

    pub fn with_executable_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.exe_dir = dir;
        self
    }

    pub fn with_search_path(mut self, path: Option<OsString>) -> Self {
        self.search_path = path;
        self
    }

    pub fn resource_dir(&self) -> &Path {
        &self.resource_dir
    }

    /// The fixed-location candidates, in lookup order
    pub fn candidates(&self, tool: MysqlTool) -> Vec<(ToolSource, PathBuf)> {
        let mut out = vec![(ToolSource::Bundled, bin_path(&self.resource_dir, tool))];
        if let Some(dir) = &self.exe_dir {
            out.push((ToolSource::ExecutableDir, bin_path(dir, tool)));
        }
        out
    }

    /// Resolve a tool, trying bundled, then executable-adjacent, then PATH
    ///
    /// # Returns
    ///
    /// The first candidate that exists, or `KeeperError::ToolNotFound`
    pub fn locate(&self, tool: MysqlTool) -> Result<ResolvedTool> {
        for (source, path) in self.candidates(tool) {
            debug!("Checking {} candidate for {}: {}", source, tool, path.display());
            if is_executable_file(&path) {
                info!("Using {} ({}): {}", tool, source, path.display());
                return Ok(ResolvedTool { tool, path, source });
            }
        }

        if let Some(path) = self.search(tool) {
            info!("Using {} from PATH: {}", tool, path.display());
            return Ok(ResolvedTool { tool, path, source: ToolSource::SearchPath });
        }

        warn!("{} not found in bundled, executable or PATH locations", tool);
        Err(KeeperError::ToolNotFound { tool: tool.file_name() })
    }

    fn search(&self, tool: MysqlTool) -> Option<PathBuf> {
        let paths = self.search_path.as_ref()?;
        let file_name = tool.file_name();
        std::env::split_paths(paths)
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(|dir| dir.join(&file_name))
            .find(|candidate| is_executable_file(candidate))
    }
}

/// Resolution and version of one tool, as shown by `tools` and the `v` key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolReport {
    pub tool: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolReport {
    /// Locate `tool` and probe its version; failures end up in `error`
    pub fn probe(locator: &ToolLocator, tool: MysqlTool) -> Self {
        let mut report = ToolReport {
            tool: tool.program().to_string(),
            source: None,
            path: None,
            version: None,
            error: None,
        };
        match locator.locate(tool) {
            Ok(resolved) => {
                report.source = Some(resolved.source.to_string());
                report.path = Some(resolved.path.clone());
                match resolved.version() {
                    Ok(version) => report.version = Some(version),
                    Err(e) => report.error = Some(format!("version probe failed: {}", e)),
                }
            }
            Err(e) => report.error = Some(e.to_string()),
        }
        report
    }
}

impl fmt::Display for ToolReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.source, &self.path) {
            (Some(source), Some(path)) => write!(f, "{} ({}): {}", self.tool, source, path.display())?,
            _ => write!(f, "{}: not found", self.tool)?,
        }
        if let Some(version) = &self.version {
            write!(f, "\n  {}", version)?;
        }
        if let Some(error) = &self.error {
            write!(f, "\n  {}", error.lines().next().unwrap_or_default())?;
        }
        Ok(())
    }
}

fn bin_path(root: &Path, tool: MysqlTool) -> PathBuf {
    root.join("mysql").join("bin").join(tool.file_name())
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_carry_platform_suffix() {
        assert_eq!(MysqlTool::Dump.file_name(), format!("mysqldump{}", EXE_SUFFIX));
        assert_eq!(MysqlTool::Client.file_name(), format!("mysql{}", EXE_SUFFIX));
    }

    #[test]
    fn candidates_are_bundled_then_executable_dir() {
        let locator = ToolLocator::new("/opt/res").with_executable_dir(Some(PathBuf::from("/usr/local/app")));
        let c = locator.candidates(MysqlTool::Dump);
        assert_eq!(c.len(), 2);
        assert_eq!(c[0].0, ToolSource::Bundled);
        assert_eq!(c[0].1, Path::new("/opt/res/mysql/bin").join(MysqlTool::Dump.file_name()));
        assert_eq!(c[1].0, ToolSource::ExecutableDir);
    }

    #[test]
    fn missing_everywhere_is_tool_not_found() {
        let locator = ToolLocator::new("/nonexistent/res")
            .with_executable_dir(None)
            .with_search_path(None);
        match locator.locate(MysqlTool::Client) {
            Err(KeeperError::ToolNotFound { tool }) => assert_eq!(tool, MysqlTool::Client.file_name()),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn report_for_missing_tool_carries_error() {
        let locator = ToolLocator::new("/nonexistent/res")
            .with_executable_dir(None)
            .with_search_path(None);
        let report = ToolReport::probe(&locator, MysqlTool::Dump);
        assert_eq!(report.tool, "mysqldump");
        assert!(report.path.is_none());
        assert!(report.error.is_some());
        assert!(report.to_string().starts_with("mysqldump: not found"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["tool"], "mysqldump");
        assert!(json.get("path").is_none());
    }
}
