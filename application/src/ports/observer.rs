//! Workflow observation port
//!
//! Defines the interface for following a workflow run as it happens.

use seeker_domain::{Command, NodeId};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Outcome of a workflow run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// `format_response` produced the reply
    Completed,
    /// Only the error node ran; the reply is the apology
    Failed,
}

/// Summary handed to observers when a turn ends
#[derive(Debug, Clone, Serialize)]
pub struct TurnSummary {
    pub session_id: String,
    pub correlation_id: String,
    pub status: RunStatus,
    pub steps: usize,
    pub visited: Vec<NodeId>,
    pub response: String,
}

/// Callbacks for workflow progress.
///
/// Called from the executor task between supersteps, never while a node is
/// suspended on I/O. Implementations live in the presentation and
/// infrastructure layers (console progress, JSONL event log, streaming).
pub trait WorkflowObserver: Send + Sync {
    fn on_turn_start(&self, _session_id: &str, _correlation_id: &str) {}

    fn on_node_start(&self, _node: NodeId) {}

    fn on_node_complete(&self, _node: NodeId, _command: &Command, _elapsed: Duration) {}

    fn on_route(&self, _from: NodeId, _to: &[NodeId]) {}

    fn on_turn_complete(&self, _summary: &TurnSummary) {}
}

/// No-op observer for when nobody is watching
pub struct NoObserver;

impl WorkflowObserver for NoObserver {}

/// Fans every callback out to several observers
#[derive(Default, Clone)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn WorkflowObserver>>,
}

impl CompositeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: Arc<dyn WorkflowObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl WorkflowObserver for CompositeObserver {
    fn on_turn_start(&self, session_id: &str, correlation_id: &str) {
        for o in &self.observers {
            o.on_turn_start(session_id, correlation_id);
        }
    }

    fn on_node_start(&self, node: NodeId) {
        for o in &self.observers {
            o.on_node_start(node);
        }
    }

    fn on_node_complete(&self, node: NodeId, command: &Command, elapsed: Duration) {
        for o in &self.observers {
            o.on_node_complete(node, command, elapsed);
        }
    }

    fn on_route(&self, from: NodeId, to: &[NodeId]) {
        for o in &self.observers {
            o.on_route(from, to);
        }
    }

    fn on_turn_complete(&self, summary: &TurnSummary) {
        for o in &self.observers {
            o.on_turn_complete(summary);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        nodes: Mutex<Vec<NodeId>>,
    }

    impl WorkflowObserver for Recorder {
        fn on_node_start(&self, node: NodeId) {
            self.nodes.lock().unwrap().push(node);
        }
    }

    #[test]
    fn test_composite_fans_out() {
        let a = Arc::new(Recorder::default());
        let b = Arc::new(Recorder::default());
        let composite = CompositeObserver::new().with(a.clone()).with(b.clone());

        composite.on_node_start(NodeId::Router);
        assert_eq!(*a.nodes.lock().unwrap(), vec![NodeId::Router]);
        assert_eq!(*b.nodes.lock().unwrap(), vec![NodeId::Router]);
        assert!(!composite.is_empty());
    }
}
