// config.rs
use directories::ProjectDirs;
use std::path::PathBuf;
use std::time::Duration;

pub const LOG_PATH_ENV: &str = "MODAL_TODOS_LOG";
pub const DEFAULT_LOG_FILTER: &str = "info";
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::resolve(std::env::var_os(LOG_PATH_ENV).map(PathBuf::from))
    }

    fn resolve(override_path: Option<PathBuf>) -> Self {
        let log_path = override_path
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(default_log_path);
        Self { log_path }
    }
}

fn default_log_path() -> PathBuf {
    let dir = ProjectDirs::from("", "", "modal-todos")
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    dir.join("modal-todos.log")
}
