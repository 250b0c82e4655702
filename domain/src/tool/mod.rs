//! Tool domain module
//!
//! Tool kinds, their input criteria and the typed results they write into
//! [`AgentResults`](crate::state::results::AgentResults).
//!
//! | Tool | Result slot | Output |
//! |------|-------------|--------|
//! | `faq_tool` | `faq` | [`FaqOutput`](faq::FaqOutput) |
//! | `book_recommendation_tool` | `book_recommendation` | [`RecommendationOutput`](book::RecommendationOutput) |
//! | `book_details_tool` | `book_details` | [`BookDetailsOutput`](book::BookDetailsOutput) |

pub mod book;
pub mod failure;
pub mod faq;
pub mod kind;
