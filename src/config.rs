use std::env;
use std::path::PathBuf;

/// Load environment variables from .env file or from the file specified in DOTENV_PATH
pub fn load_env() {
    if let Ok(dotenv_path) = env::var("DOTENV_PATH") {
        dotenvy::from_path(dotenv_path).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

/// Directory searched first for bundled `mysql/bin` tools when
/// `--resource-dir` / `SQLKEEPER_RESOURCE_DIR` is not set
///
/// This is the crate's own directory, where a development checkout keeps its
/// bundled tools.
pub fn default_resource_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}
