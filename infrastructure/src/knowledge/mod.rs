//! File-backed tool capabilities: the FAQ knowledge base and the book catalog

mod catalog;
mod faq;

pub use catalog::JsonBookCatalog;
pub use faq::FaqKnowledgeBase;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("Knowledge source not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}
