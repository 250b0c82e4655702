//! Console output formatter for chat turns

use colored::Colorize;
use seeker_application::{ChatTurnOutput, RunStatus, SessionRecord, TurnChunk};

/// Formats chat turn results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// The answer followed by a dimmed status line
    pub fn format_turn(output: &ChatTurnOutput) -> String {
        let mut text = String::new();
        match output.status {
            RunStatus::Completed => text.push_str(&output.response.output),
            RunStatus::Failed => text.push_str(&output.response.output.yellow().to_string()),
        }
        text.push_str("\n\n");
        text.push_str(&Self::status_line(output));
        text
    }

    /// Answer text only
    pub fn format_answer(output: &ChatTurnOutput) -> String {
        output.response.output.clone()
    }

    /// Pretty JSON of the whole turn
    pub fn format_json(output: &ChatTurnOutput) -> String {
        serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
    }

    /// A streamed fragment as it should appear in an interactive terminal
    pub fn format_chunk(chunk: &TurnChunk) -> String {
        if chunk.is_final() {
            chunk.response.output.clone()
        } else {
            format!("{} {}", "..".dimmed(), chunk.response.output.dimmed())
        }
    }

    pub fn status_line(output: &ChatTurnOutput) -> String {
        let status = match output.status {
            RunStatus::Completed => "completed".green(),
            RunStatus::Failed => {
                let error_type = output
                    .response
                    .data
                    .get("error_type")
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown");
                format!("failed ({error_type})").red()
            }
        };
        format!(
            "{} {}  {} {}",
            "session:".dimmed(),
            output.session_id.dimmed(),
            "status:".dimmed(),
            status
        )
    }

    /// Conversation history of a session
    pub fn format_history(record: &SessionRecord) -> String {
        let mut text = format!("{} {}\n", "Session".cyan().bold(), record.session_id);
        if let Some(summary) = &record.compressed_summary {
            text.push_str(&format!("\n{} {}\n", "Earlier:".dimmed(), summary.dimmed()));
        }
        if record.recent_turns.is_empty() {
            text.push_str("\n(no turns yet)\n");
        }
        for turn in &record.recent_turns {
            text.push_str(&format!(
                "\n{} {}\n{} {}\n",
                "you>".bold(),
                turn.user,
                "bot>".cyan().bold(),
                turn.assistant
            ));
        }
        text
    }
}
