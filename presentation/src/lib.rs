//! Presentation layer for book-seeker
//!
//! This crate contains CLI definitions, the console formatter,
//! the progress reporter and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatRepl, ReplCommand};
pub use cli::commands::{Cli, InterfaceArg};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::ProgressReporter;
