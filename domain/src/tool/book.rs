//! Book records, search criteria and the book tools' results

use crate::params::extraction::{ExtractedParameters, MAX_AGE};
use serde::{Deserialize, Serialize};

/// Reply when a recommendation search returns nothing
pub const NO_BOOKS_TEXT: &str = "I couldn't find any books matching your criteria. Could you tell me the age of the reader or what kind of stories you're interested in?";

/// A catalog entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookRecord {
    pub id: u32,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub from_age: Option<u8>,
    pub to_age: Option<u8>,
    pub purpose: Option<String>,
    pub genre: Option<String>,
    pub price: f64,
    pub tags: Vec<String>,
    pub quantity: u32,
    pub isbn: Option<String>,
}

impl BookRecord {
    /// Whether the book's age band overlaps `[from, to]`.
    ///
    /// Books without any age bounds suit every reader.
    pub fn fits_age(&self, from: u8, to: u8) -> bool {
        if self.from_age.is_none() && self.to_age.is_none() {
            return true;
        }
        let book_from = self.from_age.unwrap_or(0);
        let book_to = self.to_age.unwrap_or(MAX_AGE);
        book_from <= to && from <= book_to
    }

    pub fn age_label(&self) -> String {
        match (self.from_age, self.to_age) {
            (Some(from), Some(to)) => format!("{from}-{to}"),
            (Some(from), None) => format!("{from}+"),
            (None, Some(to)) => format!("up to {to}"),
            (None, None) => "All ages".to_string(),
        }
    }
}

/// Constraints for a recommendation search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookSearchCriteria {
    pub age_from: Option<u8>,
    pub age_to: Option<u8>,
    pub purpose: Option<String>,
    pub budget: Option<f64>,
    pub genre: Option<String>,
    pub query_text: Option<String>,
    /// Maximum number of books to return; 0 means unbounded
    pub limit: usize,
}

impl BookSearchCriteria {
    /// Build criteria from extracted parameters; a single age becomes `from = to`.
    pub fn from_parameters(params: &ExtractedParameters, query_text: Option<&str>, limit: usize) -> Self {
        let (age_from, age_to) = params.age_bounds().unzip();
        Self {
            age_from,
            age_to,
            purpose: params.purpose.clone(),
            budget: params.budget,
            genre: params.genre.clone(),
            query_text: query_text.map(str::to_string),
            limit,
        }
    }

    pub fn age_range(&self) -> Option<(u8, u8)> {
        self.age_from.zip(self.age_to)
    }
}

/// A recommended book with its justification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecommendation {
    #[serde(flatten)]
    pub book: BookRecord,
    pub reason: String,
}

/// Result written to the `book_recommendation` slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationOutput {
    pub text: String,
    pub data: Vec<BookRecommendation>,
}

impl RecommendationOutput {
    pub fn from_recommendations(recommendations: Vec<BookRecommendation>) -> Self {
        let text = match recommendations.as_slice() {
            [] => NO_BOOKS_TEXT.to_string(),
            [only] => format!(
                "I found a great book for you! \"{}\" by {} is {} Priced at ${:.2}.",
                only.book.title,
                only.book.author,
                only.reason.trim(),
                only.book.price
            ),
            many => many
                .iter()
                .map(|rec| {
                    format!(
                        "Title: {} by {}\nDescription: {}\nPrice: ${:.2}\nReason: {}",
                        rec.book.title,
                        rec.book.author,
                        rec.book.description.as_deref().unwrap_or("No description available"),
                        rec.book.price,
                        rec.reason.trim()
                    )
                })
                .collect::<Vec<_>>()
                .join("\n\n"),
        };
        Self {
            text,
            data: recommendations,
        }
    }
}

/// Deterministic justification used when no generated one is available
pub fn default_justification(book: &BookRecord, criteria: &BookSearchCriteria) -> String {
    let mut reasons = Vec::new();
    if let Some((from, to)) = criteria.age_range() {
        if from == to {
            reasons.push(format!("suited to a {from}-year-old reader"));
        } else {
            reasons.push(format!("suited to readers aged {from} to {to}"));
        }
    }
    if let Some(genre) = book.genre.as_deref() {
        reasons.push(format!("a {} story", genre.to_lowercase()));
    }
    if let (Some(wanted), Some(purpose)) = (criteria.purpose.as_deref(), book.purpose.as_deref())
        && wanted.eq_ignore_ascii_case(purpose)
    {
        reasons.push(format!("a good pick for {}", purpose.to_lowercase()));
    }

    if reasons.is_empty() {
        "a popular pick from our catalog.".to_string()
    } else {
        format!("{}.", reasons.join(" and "))
    }
}

/// Identifiers for a single-book lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLookup {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
}

impl BookLookup {
    pub fn from_parameters(params: &ExtractedParameters) -> Self {
        Self {
            title: params.title.clone(),
            author: params.author.clone(),
            isbn: params.isbn.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.isbn.is_none()
    }

    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(title) = &self.title {
            parts.push(format!("title \"{title}\""));
        }
        if let Some(author) = &self.author {
            parts.push(format!("author {author}"));
        }
        if let Some(isbn) = &self.isbn {
            parts.push(format!("ISBN {isbn}"));
        }
        if parts.is_empty() {
            "your request".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Result written to the `book_details` slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDetailsOutput {
    pub text: String,
    pub data: Vec<BookRecord>,
}

impl BookDetailsOutput {
    pub fn found(book: BookRecord) -> Self {
        let availability = if book.quantity > 0 {
            format!("{} in stock", book.quantity)
        } else {
            "Out of stock".to_string()
        };
        let mut text = format!(
            "\"{}\" by {}\nPrice: ${:.2}\nAges: {}\nAvailability: {}",
            book.title,
            book.author,
            book.price,
            book.age_label(),
            availability
        );
        if let Some(isbn) = &book.isbn {
            text.push_str(&format!("\nISBN: {isbn}"));
        }
        if let Some(description) = &book.description {
            text.push_str(&format!("\n{description}"));
        }
        Self {
            text,
            data: vec![book],
        }
    }

    pub fn not_found(lookup: &BookLookup) -> Self {
        Self {
            text: format!("I couldn't find a book matching {}.", lookup.describe()),
            data: Vec::new(),
        }
    }
}
