//! Routing vocabulary: node identifiers, router decisions and routing errors

pub mod analysis;
pub mod error;
pub mod node;
