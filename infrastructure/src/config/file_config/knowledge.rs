//! Knowledge sources from TOML (`[knowledge]` section)

use super::{ConfigValidationError, expand_path};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileKnowledgeConfig {
    /// Directory of `*.txt` FAQ files (`Q:` / `A:` lines, category = file stem)
    pub faq_dir: Option<String>,
    /// JSON array of book records
    pub catalog_path: Option<String>,
    pub semantic_top_k: usize,
    /// Minimum similarity for a semantic FAQ match
    pub semantic_threshold: f64,
}

impl Default for FileKnowledgeConfig {
    fn default() -> Self {
        Self {
            faq_dir: None,
            catalog_path: None,
            semantic_top_k: 3,
            semantic_threshold: 0.3,
        }
    }
}

impl FileKnowledgeConfig {
    pub fn faq_dir_path(&self) -> Option<PathBuf> {
        self.faq_dir.as_deref().map(expand_path)
    }

    pub fn catalog_file_path(&self) -> Option<PathBuf> {
        self.catalog_path.as_deref().map(expand_path)
    }

    pub(super) fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        if self.semantic_top_k == 0 {
            issues.push(ConfigValidationError::Zero {
                field: "knowledge.semantic_top_k",
            });
        }
        if !(0.0..=1.0).contains(&self.semantic_threshold) {
            issues.push(ConfigValidationError::OutOfRange {
                field: "knowledge.semantic_threshold",
                value: self.semantic_threshold.to_string(),
                expected: "[0, 1]",
            });
        }
        issues
    }
}
