//! Final response assembly

pub mod formatter;
