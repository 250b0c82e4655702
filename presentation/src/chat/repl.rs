//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::{ConsoleFormatter, ProgressReporter};
use colored::Colorize;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use seeker_application::{ChatTurnInput, ChatTurnUseCase, CompositeObserver, WorkflowObserver};
use seeker_domain::Interface;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

const HISTORY_CAPACITY: usize = 1000;

/// `<data dir>/book-seeker/history.txt`
pub fn default_history_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("book-seeker").join("history.txt"))
}

/// Slash commands understood by the REPL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Quit,
    History,
    ShowInterface,
    SetInterface(Interface),
    Reset,
    Unknown(String),
}

impl ReplCommand {
    /// Parse a line starting with `/`
    pub fn parse(line: &str) -> Self {
        let mut parts = line.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();
        match (name, arg) {
            ("/quit" | "/exit" | "/q", _) => ReplCommand::Quit,
            ("/help" | "/h" | "/?", _) => ReplCommand::Help,
            ("/history", _) => ReplCommand::History,
            ("/reset", _) => ReplCommand::Reset,
            ("/interface", None) => ReplCommand::ShowInterface,
            ("/interface", Some(value)) => match value.parse::<Interface>() {
                Ok(interface) => ReplCommand::SetInterface(interface),
                Err(_) => ReplCommand::Unknown(line.to_string()),
            },
            _ => ReplCommand::Unknown(line.to_string()),
        }
    }
}

/// Interactive chat REPL
pub struct ChatRepl {
    use_case: ChatTurnUseCase,
    observer: Arc<dyn WorkflowObserver>,
    interface: Interface,
    session_id: Option<String>,
    history_path: Option<PathBuf>,
    show_progress: bool,
    stream: bool,
}

impl ChatRepl {
    pub fn new(use_case: ChatTurnUseCase, interface: Interface) -> Self {
        Self {
            use_case,
            observer: Arc::new(CompositeObserver::new()),
            interface,
            session_id: None,
            history_path: default_history_path(),
            show_progress: true,
            stream: false,
        }
    }

    /// Observer notified of every turn (e.g. the event logger)
    pub fn with_observer(mut self, observer: Arc<dyn WorkflowObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_session(mut self, session_id: Option<String>) -> Self {
        self.session_id = session_id;
        self
    }

    /// Override the line history file; `None` keeps history in memory only
    pub fn with_history_path(mut self, path: Option<PathBuf>) -> Self {
        self.history_path = path;
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Print tool results as they arrive
    pub fn with_streaming(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    fn build_editor(&self) -> Reedline {
        let editor = Reedline::create();
        let Some(path) = &self.history_path else {
            return editor;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match FileBackedHistory::with_file(HISTORY_CAPACITY, path.clone()) {
            Ok(history) => editor.with_history(Box::new(history)),
            Err(e) => {
                warn!("Could not open history file {}: {}", path.display(), e);
                editor
            }
        }
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut editor = self.build_editor();
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("book-seeker".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if line.starts_with('/') {
                        if self.handle_command(ReplCommand::parse(line)).await {
                            break;
                        }
                        continue;
                    }
                    self.process_question(line).await;
                }
                Signal::CtrlC => {
                    println!("^C");
                    continue;
                }
                Signal::CtrlD => {
                    println!("Bye!");
                    break;
                }
                #[allow(unreachable_patterns)]
                _ => continue,
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "Book Seeker - Chat Mode".cyan().bold());
        println!();
        println!("Interface: {}", self.interface);
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /help                   - Show this help");
        println!("  /history                - Show this conversation");
        println!("  /interface [chat|voice] - Show or switch the interface");
        println!("  /reset                  - Start a new conversation");
        println!("  /quit                   - Exit chat");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    async fn handle_command(&mut self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => {
                println!();
                Self::print_help();
            }
            ReplCommand::ShowInterface => println!("Interface: {}", self.interface),
            ReplCommand::SetInterface(interface) => {
                self.interface = interface;
                println!("Interface switched to {}", interface);
            }
            ReplCommand::History => match &self.session_id {
                None => println!("No conversation yet."),
                Some(id) => match self.use_case.history(id).await {
                    Ok(Some(record)) => println!("{}", ConsoleFormatter::format_history(&record)),
                    Ok(None) => println!("Conversation {} has expired.", id),
                    Err(e) => eprintln!("Error: {}", e),
                },
            },
            ReplCommand::Reset => {
                if let Some(id) = self.session_id.take()
                    && let Err(e) = self.use_case.reset_session(&id).await
                {
                    eprintln!("Error: {}", e);
                }
                println!("Started a new conversation.");
            }
            ReplCommand::Unknown(line) => {
                println!("Unknown command: {}", line);
                println!("Type /help for available commands");
            }
        }
        false
    }

    fn turn_input(&self, question: &str) -> ChatTurnInput {
        let input = ChatTurnInput::new(question, self.interface.as_str());
        match &self.session_id {
            Some(id) => input.with_session(id.clone()),
            None => input,
        }
    }

    async fn process_question(&mut self, question: &str) {
        println!();
        let input = self.turn_input(question);

        if self.stream {
            let mut rx = self.use_case.execute_streaming(input, self.observer.clone());
            while let Some(chunk) = rx.recv().await {
                println!("{}", ConsoleFormatter::format_chunk(&chunk));
                if chunk.is_final() {
                    self.session_id = Some(chunk.session_id);
                }
            }
            println!();
            return;
        }

        let output = if self.show_progress {
            let observer = CompositeObserver::new()
                .with(self.observer.clone())
                .with(Arc::new(ProgressReporter::new()));
            self.use_case.execute_with_observer(input, &observer).await
        } else {
            self.use_case
                .execute_with_observer(input, self.observer.as_ref())
                .await
        };

        println!("{}", ConsoleFormatter::format_answer(&output));
        println!();
        self.session_id = Some(output.session_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReplCommand::parse("/quit"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("/q"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("/help"), ReplCommand::Help);
        assert_eq!(ReplCommand::parse("/history"), ReplCommand::History);
        assert_eq!(ReplCommand::parse("/reset"), ReplCommand::Reset);
        assert_eq!(ReplCommand::parse("/interface"), ReplCommand::ShowInterface);
        assert_eq!(
            ReplCommand::parse("/interface voice"),
            ReplCommand::SetInterface(Interface::Voice)
        );
    }

    #[test]
    fn test_default_history_path() {
        if let Some(path) = default_history_path() {
            assert!(path.ends_with("book-seeker/history.txt"));
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            ReplCommand::parse("/interface fax"),
            ReplCommand::Unknown("/interface fax".to_string())
        );
        assert_eq!(
            ReplCommand::parse("/models"),
            ReplCommand::Unknown("/models".to_string())
        );
    }
}
