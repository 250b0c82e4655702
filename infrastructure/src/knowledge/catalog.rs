//! Book catalog loaded from a JSON array of book records

use super::KnowledgeError;
use async_trait::async_trait;
use seeker_application::{BookCatalogPort, CapabilityError};
use seeker_domain::{BookLookup, BookRecord, BookSearchCriteria};
use std::cmp::Reverse;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Read-only, in-memory book catalog
#[derive(Debug, Clone, Default)]
pub struct JsonBookCatalog {
    books: Vec<BookRecord>,
}

impl JsonBookCatalog {
    pub fn new(books: Vec<BookRecord>) -> Self {
        Self { books }
    }

    pub fn load(path: &Path) -> Result<Self, KnowledgeError> {
        if !path.is_file() {
            return Err(KnowledgeError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| KnowledgeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let books: Vec<BookRecord> =
            serde_json::from_str(&content).map_err(|source| KnowledgeError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        info!("Book catalog loaded: {} books from {}", books.len(), path.display());
        Ok(Self::new(books))
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    fn matches(book: &BookRecord, criteria: &BookSearchCriteria) -> bool {
        if let Some((from, to)) = criteria.age_range()
            && !book.fits_age(from, to)
        {
            return false;
        }
        if let Some(purpose) = &criteria.purpose
            && !book
                .purpose
                .as_deref()
                .is_some_and(|p| p.eq_ignore_ascii_case(purpose))
        {
            return false;
        }
        if let Some(genre) = &criteria.genre {
            let wanted = genre.to_lowercase();
            if !book
                .genre
                .as_deref()
                .is_some_and(|g| g.to_lowercase().contains(&wanted))
            {
                return false;
            }
        }
        if let Some(budget) = criteria.budget
            && book.price > budget
        {
            return false;
        }
        true
    }

    fn search(&self, criteria: &BookSearchCriteria) -> Vec<BookRecord> {
        let query_tokens = criteria.query_text.as_deref().map(tokenize).unwrap_or_default();

        let mut ranked: Vec<(usize, &BookRecord)> = self
            .books
            .iter()
            .filter(|book| Self::matches(book, criteria))
            .map(|book| (relevance(book, &query_tokens), book))
            .collect();
        // Relevance first, then in-stock books, then catalog order
        ranked.sort_by_key(|(score, book)| (Reverse(*score), book.quantity == 0));

        let limit = if criteria.limit == 0 { usize::MAX } else { criteria.limit };
        ranked.into_iter().take(limit).map(|(_, book)| book.clone()).collect()
    }

    fn lookup(&self, lookup: &BookLookup) -> Option<BookRecord> {
        if let Some(isbn) = lookup.isbn.as_deref().map(normalize_isbn)
            && let Some(book) = self
                .books
                .iter()
                .find(|b| b.isbn.as_deref().map(normalize_isbn).as_deref() == Some(isbn.as_str()))
        {
            return Some(book.clone());
        }

        if lookup.title.is_none() && lookup.author.is_none() {
            return None;
        }
        let title = lookup.title.as_deref().map(str::to_lowercase);
        let author = lookup.author.as_deref().map(str::to_lowercase);
        self.books
            .iter()
            .find(|book| {
                title
                    .as_ref()
                    .is_none_or(|t| book.title.to_lowercase().contains(t))
                    && author
                        .as_ref()
                        .is_none_or(|a| book.author.to_lowercase().contains(a))
            })
            .cloned()
    }
}

fn normalize_isbn(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 2)
        .map(str::to_lowercase)
        .collect()
}

/// Number of query tokens found in the book's title, description or tags
fn relevance(book: &BookRecord, query_tokens: &HashSet<String>) -> usize {
    if query_tokens.is_empty() {
        return 0;
    }
    let mut haystack = tokenize(&book.title);
    if let Some(description) = &book.description {
        haystack.extend(tokenize(description));
    }
    for tag in &book.tags {
        haystack.extend(tokenize(tag));
    }
    query_tokens.intersection(&haystack).count()
}

#[async_trait]
impl BookCatalogPort for JsonBookCatalog {
    async fn search_books(
        &self,
        criteria: &BookSearchCriteria,
    ) -> Result<Vec<BookRecord>, CapabilityError> {
        let books = self.search(criteria);
        debug!(
            age = ?criteria.age_range(),
            genre = ?criteria.genre,
            budget = ?criteria.budget,
            found = books.len(),
            "Catalog search"
        );
        Ok(books)
    }

    async fn find_book(&self, lookup: &BookLookup) -> Result<Option<BookRecord>, CapabilityError> {
        Ok(self.lookup(lookup))
    }
}
