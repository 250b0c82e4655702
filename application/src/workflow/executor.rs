//! Superstep executor
//!
//! Runs the nodes of a frontier concurrently on one state snapshot, folds
//! their deltas into the state in completion order, then evaluates each
//! node's outgoing edge on the merged state to build the next frontier.

use super::graph::WorkflowGraph;
use super::routing::panic_message;
use crate::ports::observer::{RunStatus, WorkflowObserver};
use chrono::Utc;
use futures::FutureExt;
use seeker_domain::{
    AgentState, Command, FALLBACK_APOLOGY, FaultKind, MessageKind, NodeId, NodeMetrics,
    SharedData,
};
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct WorkflowRun {
    pub state: AgentState,
    pub status: RunStatus,
    pub steps: usize,
    pub visited: Vec<NodeId>,
    pub response: String,
    /// Fault taxonomy of the first failure, when the run failed
    pub error_type: Option<String>,
}

pub struct WorkflowExecutor {
    graph: Arc<WorkflowGraph>,
    max_steps: usize,
}

impl WorkflowExecutor {
    pub fn new(graph: WorkflowGraph, max_steps: usize) -> Self {
        Self {
            graph: Arc::new(graph),
            max_steps: max_steps.max(1),
        }
    }

    pub fn graph(&self) -> &WorkflowGraph {
        &self.graph
    }

    /// Drive `state` from the entry node to a terminal node.
    ///
    /// Never fails: node failures and routing failures end their branch in
    /// `error`, and a run that never reaches `format_response` is reported
    /// as [`RunStatus::Failed`] with the apology text.
    pub async fn run(&self, mut state: AgentState, observer: &dyn WorkflowObserver) -> WorkflowRun {
        let mut frontier = vec![self.graph.entry()];
        let mut visited: Vec<NodeId> = Vec::new();
        let mut merge_held = false;
        let mut limit_hit = false;
        let mut steps = 0;

        while !frontier.is_empty() {
            steps += 1;
            debug!(step = steps, frontier = ?frontier, "Superstep");

            let completed = self.run_superstep(&frontier, &mut state, observer).await;
            visited.extend(frontier.iter().copied());

            let mut next: Vec<NodeId> = Vec::new();
            for id in &frontier {
                let targets = if completed.contains(id) {
                    self.graph.next(*id, &state)
                } else {
                    vec![NodeId::Error]
                };
                observer.on_route(*id, &targets);
                for target in targets {
                    if !next.contains(&target) {
                        next.push(target);
                    }
                }
            }

            // Terminal nodes run at most once per request
            next.retain(|n| !(n.is_terminal() && visited.contains(n)));

            // merge_tools waits until every other live branch has arrived
            let wants_merge = merge_held || next.contains(&NodeId::MergeTools);
            next.retain(|n| *n != NodeId::MergeTools);
            if wants_merge {
                merge_held = next.iter().any(|n| *n != NodeId::Error);
                if !merge_held {
                    next.push(NodeId::MergeTools);
                }
            }

            if !next.is_empty() && steps >= self.max_steps && !limit_hit {
                limit_hit = true;
                warn!(max_steps = self.max_steps, pending = ?next, "Step limit reached");
                if visited.contains(&NodeId::Error) {
                    break;
                }
                state.apply(Command::fault(
                    next[0],
                    FaultKind::Internal,
                    format!("step limit of {} reached", self.max_steps),
                ));
                next = vec![NodeId::Error];
                merge_held = false;
            }

            frontier = next;
        }

        let status = if visited.contains(&NodeId::FormatResponse) {
            RunStatus::Completed
        } else {
            RunStatus::Failed
        };
        let response = match status {
            RunStatus::Completed => state
                .messages
                .iter()
                .rev()
                .find(|m| m.kind == MessageKind::FinalResponse)
                .map(|m| m.content.clone())
                .unwrap_or_else(|| FALLBACK_APOLOGY.to_string()),
            RunStatus::Failed => FALLBACK_APOLOGY.to_string(),
        };
        let error_type = match status {
            RunStatus::Completed => None,
            RunStatus::Failed => Some(
                state
                    .shared_data
                    .node_faults
                    .first()
                    .map(|f| f.kind)
                    .unwrap_or(FaultKind::Routing)
                    .as_str()
                    .to_string(),
            ),
        };

        info!(
            session_id = %state.session_id,
            ?status,
            steps,
            nodes = visited.len(),
            "Workflow finished"
        );

        WorkflowRun {
            state,
            status,
            steps,
            visited,
            response,
            error_type,
        }
    }

    /// Run one frontier; returns the nodes whose deltas were applied
    async fn run_superstep(
        &self,
        frontier: &[NodeId],
        state: &mut AgentState,
        observer: &dyn WorkflowObserver,
    ) -> Vec<NodeId> {
        let snapshot = Arc::new(state.clone());
        let mut join_set = JoinSet::new();

        for id in frontier.iter().copied() {
            let Some(node) = self.graph.node(id) else {
                warn!(node = %id, "Node missing from graph");
                continue;
            };
            observer.on_node_start(id);
            let snapshot = Arc::clone(&snapshot);

            join_set.spawn(async move {
                let started = Instant::now();
                let command = AssertUnwindSafe(node.run(&snapshot))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|payload| {
                        Command::fault(
                            id,
                            FaultKind::Internal,
                            format!("node panicked: {}", panic_message(payload.as_ref())),
                        )
                    });
                (id, command, started.elapsed())
            });
        }

        let mut completed = Vec::with_capacity(frontier.len());
        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((id, command, elapsed)) => {
                    info!(node = %id, elapsed_ms = elapsed.as_millis() as u64, "Node completed");
                    observer.on_node_complete(id, &command, elapsed);
                    state.apply(command);
                    state.apply(metrics_delta(id, elapsed));
                    completed.push(id);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }
        completed
    }
}

fn metrics_delta(node: NodeId, elapsed: Duration) -> Command {
    let mut performance_metrics = BTreeMap::new();
    performance_metrics.insert(
        node.as_str().to_string(),
        NodeMetrics::single(elapsed.as_millis() as u64),
    );
    Command::new().with_shared_data(SharedData {
        access_count: 1,
        last_accessed: Some(Utc::now()),
        performance_metrics,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::observer::NoObserver;
    use crate::workflow::graph::GraphBuilder;
    use crate::workflow::node::WorkflowNode;
    use async_trait::async_trait;
    use seeker_domain::{Message, MessageKind};
    use std::sync::Mutex;

    /// Emits one message and optionally panics
    struct StubNode {
        id: NodeId,
        kind: MessageKind,
        panics: bool,
    }

    #[async_trait]
    impl WorkflowNode for StubNode {
        fn id(&self) -> NodeId {
            self.id
        }

        async fn run(&self, _state: &AgentState) -> Command {
            if self.panics {
                panic!("boom");
            }
            Command::new().with_message(Message::ai(self.id, self.kind, self.id.as_str()))
        }
    }

    fn stub(id: NodeId, kind: MessageKind) -> Arc<dyn WorkflowNode> {
        Arc::new(StubNode {
            id,
            kind,
            panics: false,
        })
    }

    fn panicking(id: NodeId) -> Arc<dyn WorkflowNode> {
        Arc::new(StubNode {
            id,
            kind: MessageKind::Routing,
            panics: true,
        })
    }

    fn state() -> AgentState {
        AgentState::initial("s-1", "chat", "hello").unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        started: Mutex<Vec<NodeId>>,
    }

    impl WorkflowObserver for Recorder {
        fn on_node_start(&self, node: NodeId) {
            self.started.lock().unwrap().push(node);
        }
    }

    #[tokio::test]
    async fn test_linear_run_completes() {
        let graph = GraphBuilder::new()
            .add_node(stub(NodeId::Router, MessageKind::Routing))
            .add_node(stub(NodeId::FormatResponse, MessageKind::FinalResponse))
            .add_node(stub(NodeId::Error, MessageKind::Error))
            .add_edge(NodeId::Router, NodeId::FormatResponse)
            .add_end(NodeId::FormatResponse)
            .add_end(NodeId::Error)
            .set_entry(NodeId::Router)
            .compile()
            .unwrap();

        let run = WorkflowExecutor::new(graph, 5).run(state(), &NoObserver).await;
        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(run.response, "format_response");
        assert_eq!(run.visited, vec![NodeId::Router, NodeId::FormatResponse]);
        assert_eq!(run.state.shared_data.access_count, 2);
        assert_eq!(run.state.shared_data.performance_metrics["router_node"].invocations, 1);
        assert!(run.error_type.is_none());
    }

    #[tokio::test]
    async fn test_panicking_node_routes_to_error() {
        let graph = GraphBuilder::new()
            .add_node(panicking(NodeId::Router))
            .add_node(stub(NodeId::FormatResponse, MessageKind::FinalResponse))
            .add_node(stub(NodeId::Error, MessageKind::Error))
            .add_conditional_edges(
                NodeId::Router,
                vec![NodeId::FormatResponse, NodeId::Error],
                |state| {
                    if state.has_fault(NodeId::Router) {
                        Ok(vec![NodeId::Error])
                    } else {
                        Ok(vec![NodeId::FormatResponse])
                    }
                },
            )
            .add_end(NodeId::FormatResponse)
            .add_end(NodeId::Error)
            .set_entry(NodeId::Router)
            .compile()
            .unwrap();

        let run = WorkflowExecutor::new(graph, 5).run(state(), &NoObserver).await;
        assert_eq!(run.status, RunStatus::Failed);
        assert_eq!(run.response, FALLBACK_APOLOGY);
        assert_eq!(run.visited, vec![NodeId::Router, NodeId::Error]);
        assert_eq!(run.error_type.as_deref(), Some("internal"));
    }

    #[tokio::test]
    async fn test_merge_waits_for_all_branches() {
        use seeker_domain::{AgentKind, ToolKind};
        let faq = NodeId::Tool(ToolKind::Faq);
        let general = NodeId::Agent(AgentKind::General);
        let voice = NodeId::Agent(AgentKind::GeneralVoice);

        // One agent goes to a tool, the other straight to merge
        let graph = GraphBuilder::new()
            .add_node(stub(NodeId::AgentCoordinator, MessageKind::Coordination))
            .add_node(stub(general, MessageKind::AgentAnalysis))
            .add_node(stub(voice, MessageKind::AgentNotice))
            .add_node(stub(faq, MessageKind::ToolResult))
            .add_node(stub(NodeId::MergeTools, MessageKind::Merge))
            .add_node(stub(NodeId::FormatResponse, MessageKind::FinalResponse))
            .add_node(stub(NodeId::Error, MessageKind::Error))
            .add_conditional_edges(NodeId::AgentCoordinator, vec![general, voice], move |_| {
                Ok(vec![general, voice])
            })
            .add_edge(general, faq)
            .add_edge(voice, NodeId::MergeTools)
            .add_edge(faq, NodeId::MergeTools)
            .add_edge(NodeId::MergeTools, NodeId::FormatResponse)
            .add_end(NodeId::FormatResponse)
            .add_end(NodeId::Error)
            .set_entry(NodeId::AgentCoordinator)
            .compile()
            .unwrap();

        let recorder = Recorder::default();
        let run = WorkflowExecutor::new(graph, 10).run(state(), &recorder).await;

        assert_eq!(run.status, RunStatus::Completed);
        let started = recorder.started.lock().unwrap();
        let merges = started.iter().filter(|n| **n == NodeId::MergeTools).count();
        assert_eq!(merges, 1);
        let merge_at = started.iter().position(|n| *n == NodeId::MergeTools).unwrap();
        let faq_at = started.iter().position(|n| *n == faq).unwrap();
        assert!(faq_at < merge_at);
    }

    #[tokio::test]
    async fn test_step_limit_routes_to_error() {
        // Router loops back to itself forever
        let graph = GraphBuilder::new()
            .add_node(stub(NodeId::Router, MessageKind::Routing))
            .add_node(stub(NodeId::FormatResponse, MessageKind::FinalResponse))
            .add_node(stub(NodeId::Error, MessageKind::Error))
            .add_edge(NodeId::Router, NodeId::Router)
            .add_end(NodeId::FormatResponse)
            .add_end(NodeId::Error)
            .set_entry(NodeId::Router)
            .compile()
            .unwrap();

        let run = WorkflowExecutor::new(graph, 3).run(state(), &NoObserver).await;
        assert_eq!(run.status, RunStatus::Failed);
        assert_eq!(run.steps, 4);
        assert_eq!(run.visited.last(), Some(&NodeId::Error));
        assert_eq!(run.error_type.as_deref(), Some("internal"));
    }
}
