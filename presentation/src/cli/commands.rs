//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Interface the request is served through
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InterfaceArg {
    /// Text chat (all chat agents)
    Chat,
    /// Voice assistant (voice agents only, spoken-style answers)
    Voice,
}

impl InterfaceArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterfaceArg::Chat => "chat",
            InterfaceArg::Voice => "voice",
        }
    }
}

/// CLI arguments for book-seeker
#[derive(Parser, Debug)]
#[command(name = "book-seeker")]
#[command(author, version, about = "Bookstore assistant - FAQ answers and book recommendations")]
#[command(long_about = r#"
Book Seeker answers bookstore questions and recommends books.

Each question is routed to an agent, which selects tools (FAQ search,
book recommendation, book details). Tool results are merged into a
single answer.

Configuration files are loaded from (in priority order):
1. BOOK_SEEKER_<SECTION>__<KEY>             Environment variables
2. --config <path>                          Explicit config file
3. ./book-seeker.toml                       Project-level config
4. ~/.config/book-seeker/config.toml        Global config

Example:
  book-seeker "What are your opening hours?"
  book-seeker --interface voice "A book for my 8 year old about dragons"
  book-seeker --stream --session abc "Any mystery books under $15?"
  book-seeker                               (interactive chat)
"#)]
pub struct Cli {
    /// The question to ask (omit to start interactive chat)
    pub question: Option<String>,

    /// Request interface (defaults to workflow.default_interface)
    #[arg(short, long, value_enum)]
    pub interface: Option<InterfaceArg>,

    /// Continue an existing conversation
    #[arg(short, long, value_name = "ID")]
    pub session: Option<String>,

    /// Stream tool results as NDJSON lines
    #[arg(long)]
    pub stream: bool,

    /// Print the full turn result as JSON
    #[arg(long, conflicts_with = "stream")]
    pub json: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(long)]
    pub no_progress: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Log filter derived from the `-v` count
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Whether the progress spinner should be drawn
    pub fn show_progress(&self) -> bool {
        !self.no_progress && !self.stream && !self.json
    }
}
