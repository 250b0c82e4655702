//! Logging destinations from TOML (`[logging]` section)

use super::expand_path;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL workflow event log
    pub events_path: Option<String>,
    /// Directory for the daily rolling text log
    pub file_dir: Option<String>,
}

impl FileLoggingConfig {
    pub fn events_file_path(&self) -> Option<PathBuf> {
        self.events_path.as_deref().map(expand_path)
    }

    pub fn log_dir_path(&self) -> Option<PathBuf> {
        self.file_dir.as_deref().map(expand_path)
    }
}
