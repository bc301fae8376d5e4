#![cfg(unix)]

use std::ffi::OsString;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use sqlkeeper::tools::{MysqlTool, ToolLocator, ToolSource};
use tempfile::TempDir;

fn fake_tool(dir: &Path, name: &str, version: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\necho '{}'\necho 'second line'\n", version)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

struct Layout {
    _root: TempDir,
    resources: PathBuf,
    exe_dir: PathBuf,
    path_dir: PathBuf,
}

fn layout() -> Layout {
    let root = TempDir::new().unwrap();
    let resources = root.path().join("resources");
    let exe_dir = root.path().join("app");
    let path_dir = root.path().join("usr-bin");
    fs::create_dir_all(&resources).unwrap();
    fs::create_dir_all(&exe_dir).unwrap();
    fs::create_dir_all(&path_dir).unwrap();
    Layout { _root: root, resources, exe_dir, path_dir }
}

impl Layout {
    fn locator(&self) -> ToolLocator {
        ToolLocator::new(&self.resources)
            .with_executable_dir(Some(self.exe_dir.clone()))
            .with_search_path(Some(OsString::from(self.path_dir.as_os_str())))
    }
}

#[test]
fn test_bundled_tool_wins_over_everything() {
    let l = layout();
    let bundled = fake_tool(&l.resources.join("mysql/bin"), "mysqldump", "bundled");
    fake_tool(&l.exe_dir.join("mysql/bin"), "mysqldump", "adjacent");
    fake_tool(&l.path_dir, "mysqldump", "system");

    let resolved = l.locator().locate(MysqlTool::Dump).unwrap();
    assert_eq!(resolved.source, ToolSource::Bundled);
    assert_eq!(resolved.path, bundled);
}

#[test]
fn test_executable_dir_used_when_nothing_bundled() {
    let l = layout();
    let adjacent = fake_tool(&l.exe_dir.join("mysql/bin"), "mysql", "adjacent");
    fake_tool(&l.path_dir, "mysql", "system");

    let resolved = l.locator().locate(MysqlTool::Client).unwrap();
    assert_eq!(resolved.source, ToolSource::ExecutableDir);
    assert_eq!(resolved.path, adjacent);
}

#[test]
fn test_search_path_is_last_resort() {
    let l = layout();
    let system = fake_tool(&l.path_dir, "mysql", "system");

    let resolved = l.locator().locate(MysqlTool::Client).unwrap();
    assert_eq!(resolved.source, ToolSource::SearchPath);
    assert_eq!(resolved.path, system);
}

#[test]
fn test_non_executable_candidate_is_skipped() {
    let l = layout();
    let bin = l.resources.join("mysql/bin");
    fs::create_dir_all(&bin).unwrap();
    fs::write(bin.join("mysqldump"), "not a program").unwrap();
    fs::set_permissions(bin.join("mysqldump"), fs::Permissions::from_mode(0o644)).unwrap();
    let system = fake_tool(&l.path_dir, "mysqldump", "system");

    let resolved = l.locator().locate(MysqlTool::Dump).unwrap();
    assert_eq!(resolved.path, system);
}

#[test]
fn test_tools_resolve_independently() {
    let l = layout();
    fake_tool(&l.resources.join("mysql/bin"), "mysqldump", "bundled");
    fake_tool(&l.path_dir, "mysql", "system");

    let locator = l.locator();
    assert_eq!(locator.locate(MysqlTool::Dump).unwrap().source, ToolSource::Bundled);
    assert_eq!(locator.locate(MysqlTool::Client).unwrap().source, ToolSource::SearchPath);
}

#[test]
fn test_version_probe_reports_first_line() {
    let l = layout();
    fake_tool(&l.path_dir, "mysqldump", "mysqldump  Ver 8.0.36 for Linux on x86_64");

    let resolved = l.locator().locate(MysqlTool::Dump).unwrap();
    assert_eq!(resolved.version().unwrap(), "mysqldump  Ver 8.0.36 for Linux on x86_64");
}

#[test]
fn test_nothing_found_names_the_tool() {
    let l = layout();
    let err = l.locator().locate(MysqlTool::Dump).unwrap_err();
    assert!(err.to_string().contains("mysqldump"));
}
