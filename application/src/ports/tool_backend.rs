//! Tool backend ports
//!
//! Black-box capabilities consumed by the tool nodes: FAQ search and the
//! book catalog. Their internal ranking and filtering are the adapter's
//! concern.

use async_trait::async_trait;
use seeker_domain::{BookLookup, BookRecord, BookSearchCriteria, FaqEntry, FaqMatch};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("Capability unavailable: {0}")]
    Unavailable(String),

    #[error("Capability failed: {0}")]
    Failed(String),

    #[error("Capability timed out")]
    Timeout,
}

#[async_trait]
pub trait FaqSearchPort: Send + Sync {
    /// Ranked matches at or above `threshold`, at most `top_k`
    async fn semantic_search(
        &self,
        query: &str,
        top_k: usize,
        threshold: f64,
    ) -> Result<Vec<FaqMatch>, CapabilityError>;

    async fn keyword_search(&self, query: &str) -> Result<Vec<FaqEntry>, CapabilityError>;
}

#[async_trait]
pub trait BookCatalogPort: Send + Sync {
    /// Ranked books satisfying `criteria`
    async fn search_books(
        &self,
        criteria: &BookSearchCriteria,
    ) -> Result<Vec<BookRecord>, CapabilityError>;

    /// A single book by ISBN, else by title and/or author
    async fn find_book(&self, lookup: &BookLookup) -> Result<Option<BookRecord>, CapabilityError>;
}
