//! Infrastructure layer for book-seeker
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the OpenAI-compatible model gateway,
//! file-backed FAQ and catalog capabilities, the session store, the
//! JSONL event logger and configuration file loading.

pub mod config;
pub mod knowledge;
pub mod llm;
pub mod logging;
pub mod session;

// Re-export commonly used types
pub use config::{ConfigError, ConfigLoader, ConfigValidationError, FileConfig};
pub use knowledge::{FaqKnowledgeBase, JsonBookCatalog, KnowledgeError};
pub use llm::OpenAiGateway;
pub use logging::JsonlEventLogger;
pub use session::InMemorySessionStore;
