//! Session memory settings from TOML (`[session]` section)

use super::ConfigValidationError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// Idle time after which a conversation is forgotten
    pub ttl_seconds: u64,
    /// Turns kept verbatim before older ones are folded into the summary
    pub max_turns: usize,
    pub summary_max_chars: usize,
    /// Age after which cached workflow states are swept
    pub state_ttl_seconds: u64,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 1800,
            max_turns: 10,
            summary_max_chars: 2000,
            state_ttl_seconds: 3600,
        }
    }
}

impl FileSessionConfig {
    pub(super) fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        if self.ttl_seconds == 0 {
            issues.push(ConfigValidationError::Zero {
                field: "session.ttl_seconds",
            });
        }
        if self.max_turns == 0 {
            issues.push(ConfigValidationError::Zero {
                field: "session.max_turns",
            });
        }
        if self.state_ttl_seconds == 0 {
            issues.push(ConfigValidationError::Zero {
                field: "session.state_ttl_seconds",
            });
        }
        issues
    }
}
