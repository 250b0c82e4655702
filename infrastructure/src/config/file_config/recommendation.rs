//! Recommendation settings from TOML (`[recommendation]` section)

use super::ConfigValidationError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRecommendationConfig {
    pub max_results: usize,
    /// Books per justification request
    pub explanation_batch_size: usize,
}

impl Default for FileRecommendationConfig {
    fn default() -> Self {
        Self {
            max_results: 3,
            explanation_batch_size: 5,
        }
    }
}

impl FileRecommendationConfig {
    pub(super) fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        if self.max_results == 0 {
            issues.push(ConfigValidationError::Zero {
                field: "recommendation.max_results",
            });
        }
        if self.explanation_batch_size == 0 {
            issues.push(ConfigValidationError::Zero {
                field: "recommendation.explanation_batch_size",
            });
        }
        issues
    }
}
