//! Configuration file loading for book-seeker
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `BOOK_SEEKER_<SECTION>__<KEY>`
//! 2. `--config <path>` specified file
//! 3. Project root: `./book-seeker.toml` or `./.book-seeker.toml`
//! 4. Global: `~/.config/book-seeker/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileKnowledgeConfig, FileLlmConfig, FileLoggingConfig,
    FileRecommendationConfig, FileSessionConfig, FileWorkflowConfig,
};
pub use loader::{ConfigError, ConfigLoader};
