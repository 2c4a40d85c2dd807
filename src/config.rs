use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const HISTORY_FILE: &str = "clipboard_history.json";
pub const ERROR_LOG_FILE: &str = "clipstash_errors.log";

/// Where the history and the error log live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub data_dir: PathBuf,
}

impl AppPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Default location.
    pub fn default_location() -> Result<Self> {
        let dir = directories::ProjectDirs::from("com", "clipstash", "Clipstash")
            .context("could not determine data directory")?;
        Ok(Self::new(dir.data_dir()))
    }

    /// Use `data_dir` when given, otherwise the platform default.
    pub fn resolve(data_dir: Option<&Path>) -> Result<Self> {
        match data_dir {
            Some(dir) => Ok(Self::new(dir)),
            None => Self::default_location(),
        }
    }

    pub fn history_file(&self) -> PathBuf {
        self.data_dir.join(HISTORY_FILE)
    }

    pub fn error_log_file(&self) -> PathBuf {
        self.data_dir.join(ERROR_LOG_FILE)
    }
}
