//! Progress reporting for workflow execution

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use seeker_application::{RunStatus, TurnSummary, WorkflowObserver};
use seeker_domain::{Command, NodeId, ToolKind};
use std::time::Duration;

/// Spinner that follows the workflow node by node
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(Self::spinner_style());
        bar.set_prefix("thinking");
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Reporter that draws nothing
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn node_label(node: NodeId) -> &'static str {
        match node {
            NodeId::Router => "Understanding your question",
            NodeId::ParameterExtraction => "Extracting details",
            NodeId::AgentCoordinator => "Coordinating agents",
            NodeId::Agent(_) => "Choosing tools",
            NodeId::Tool(ToolKind::Faq) => "Searching the FAQ",
            NodeId::Tool(ToolKind::BookRecommendation) => "Finding books",
            NodeId::Tool(ToolKind::BookDetails) => "Looking up the book",
            NodeId::MergeTools => "Combining results",
            NodeId::FormatResponse => "Writing the answer",
            NodeId::Error => "Recovering",
        }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowObserver for ProgressReporter {
    fn on_node_start(&self, node: NodeId) {
        self.bar.set_message(Self::node_label(node).to_string());
    }

    fn on_node_complete(&self, node: NodeId, command: &Command, _elapsed: Duration) {
        self.bar.inc(1);
        let failed = command
            .shared_data
            .as_ref()
            .is_some_and(|shared| !shared.node_faults.is_empty() || !shared.tool_failures.is_empty());
        if failed {
            self.bar
                .println(format!("  {} {}", "x".red(), node.as_str().dimmed()));
        }
    }

    fn on_turn_complete(&self, summary: &TurnSummary) {
        match summary.status {
            RunStatus::Completed => self.bar.finish_and_clear(),
            RunStatus::Failed => self
                .bar
                .abandon_with_message(format!("{}", "could not complete the request".red())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seeker_domain::{AgentKind, FaultKind};

    #[test]
    fn test_counts_completed_nodes() {
        let reporter = ProgressReporter::hidden();
        reporter.on_node_start(NodeId::Router);
        reporter.on_node_complete(NodeId::Router, &Command::new(), Duration::from_millis(3));
        reporter.on_node_start(NodeId::Agent(AgentKind::General));
        reporter.on_node_complete(
            NodeId::Agent(AgentKind::General),
            &Command::fault(NodeId::Agent(AgentKind::General), FaultKind::ExternalCall, "timeout"),
            Duration::from_millis(3),
        );
        assert_eq!(reporter.position(), 2);
    }

    #[test]
    fn test_every_node_has_a_label() {
        for node in [NodeId::Router, NodeId::MergeTools, NodeId::Error] {
            assert!(!ProgressReporter::node_label(node).is_empty());
        }
    }
}
