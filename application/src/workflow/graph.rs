//! Graph definition and builder

use super::node::WorkflowNode;
use super::routing::safe_route;
use seeker_domain::{AgentState, NodeId, RoutingError};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Routing function of a conditional edge
pub type RouteFn = Arc<dyn Fn(&AgentState) -> Result<Vec<NodeId>, RoutingError> + Send + Sync>;

/// Outgoing edge of a node
#[derive(Clone)]
pub enum Edge {
    /// Always continue with the given node
    Static(NodeId),
    /// Targets computed from state, restricted to the declared set
    Conditional { targets: Vec<NodeId>, route: RouteFn },
    /// The run ends after this node
    End,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Workflow has no entry node")]
    MissingEntry,

    #[error("Node registered twice: {0}")]
    DuplicateNode(NodeId),

    #[error("Edge references unregistered node: {0}")]
    UnknownNode(NodeId),

    #[error("Node has no outgoing edge: {0}")]
    MissingEdge(NodeId),

    #[error("Workflow must register the error node")]
    MissingErrorNode,
}

#[derive(Default)]
pub struct GraphBuilder {
    nodes: HashMap<NodeId, Arc<dyn WorkflowNode>>,
    edges: HashMap<NodeId, Edge>,
    entry: Option<NodeId>,
    duplicate: Option<NodeId>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(mut self, node: Arc<dyn WorkflowNode>) -> Self {
        let id = node.id();
        if self.nodes.insert(id, node).is_some() && self.duplicate.is_none() {
            self.duplicate = Some(id);
        }
        self
    }

    pub fn add_edge(mut self, from: NodeId, to: NodeId) -> Self {
        self.edges.insert(from, Edge::Static(to));
        self
    }

    pub fn add_conditional_edges<F>(mut self, from: NodeId, targets: Vec<NodeId>, route: F) -> Self
    where
        F: Fn(&AgentState) -> Result<Vec<NodeId>, RoutingError> + Send + Sync + 'static,
    {
        self.edges.insert(
            from,
            Edge::Conditional {
                targets,
                route: Arc::new(route),
            },
        );
        self
    }

    pub fn add_end(mut self, from: NodeId) -> Self {
        self.edges.insert(from, Edge::End);
        self
    }

    pub fn set_entry(mut self, entry: NodeId) -> Self {
        self.entry = Some(entry);
        self
    }

    /// Check the wiring and freeze the graph
    pub fn compile(self) -> Result<WorkflowGraph, WorkflowError> {
        if let Some(id) = self.duplicate {
            return Err(WorkflowError::DuplicateNode(id));
        }
        let entry = self.entry.ok_or(WorkflowError::MissingEntry)?;
        if !self.nodes.contains_key(&entry) {
            return Err(WorkflowError::UnknownNode(entry));
        }
        if !self.nodes.contains_key(&NodeId::Error) {
            return Err(WorkflowError::MissingErrorNode);
        }

        for id in self.nodes.keys() {
            let edge = self.edges.get(id).ok_or(WorkflowError::MissingEdge(*id))?;
            let targets = match edge {
                Edge::Static(to) => std::slice::from_ref(to),
                Edge::Conditional { targets, .. } => targets.as_slice(),
                Edge::End => &[],
            };
            if let Some(missing) = targets.iter().find(|t| !self.nodes.contains_key(t)) {
                return Err(WorkflowError::UnknownNode(*missing));
            }
        }
        if let Some(orphan) = self.edges.keys().find(|from| !self.nodes.contains_key(from)) {
            return Err(WorkflowError::UnknownNode(*orphan));
        }

        Ok(WorkflowGraph {
            nodes: self.nodes,
            edges: self.edges,
            entry,
        })
    }
}

/// A compiled, immutable workflow graph
pub struct WorkflowGraph {
    nodes: HashMap<NodeId, Arc<dyn WorkflowNode>>,
    edges: HashMap<NodeId, Edge>,
    entry: NodeId,
}

impl WorkflowGraph {
    pub fn entry(&self) -> NodeId {
        self.entry
    }

    pub fn node(&self, id: NodeId) -> Option<Arc<dyn WorkflowNode>> {
        self.nodes.get(&id).cloned()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Successors of `from` given the state after it ran.
    ///
    /// Conditional edges go through [`safe_route`], so this never panics and
    /// any routing failure yields `[NodeId::Error]`.
    pub fn next(&self, from: NodeId, state: &AgentState) -> Vec<NodeId> {
        match self.edges.get(&from) {
            Some(Edge::Static(to)) => vec![*to],
            Some(Edge::Conditional { targets, route }) => {
                safe_route(from, route.as_ref(), targets, state)
            }
            Some(Edge::End) | None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use seeker_domain::Command;

    struct Noop(NodeId);

    #[async_trait]
    impl WorkflowNode for Noop {
        fn id(&self) -> NodeId {
            self.0
        }

        async fn run(&self, _state: &AgentState) -> Command {
            Command::new()
        }
    }

    fn noop(id: NodeId) -> Arc<dyn WorkflowNode> {
        Arc::new(Noop(id))
    }

    #[test]
    fn test_compile_requires_entry_and_edges() {
        let err = GraphBuilder::new()
            .add_node(noop(NodeId::Router))
            .add_node(noop(NodeId::Error))
            .add_end(NodeId::Error)
            .compile()
            .err();
        assert_eq!(err, Some(WorkflowError::MissingEntry));

        let err = GraphBuilder::new()
            .add_node(noop(NodeId::Router))
            .add_node(noop(NodeId::Error))
            .add_end(NodeId::Error)
            .set_entry(NodeId::Router)
            .compile()
            .err();
        assert_eq!(err, Some(WorkflowError::MissingEdge(NodeId::Router)));
    }

    #[test]
    fn test_compile_rejects_dangling_targets() {
        let err = GraphBuilder::new()
            .add_node(noop(NodeId::Router))
            .add_node(noop(NodeId::Error))
            .add_edge(NodeId::Router, NodeId::ParameterExtraction)
            .add_end(NodeId::Error)
            .set_entry(NodeId::Router)
            .compile()
            .err();
        assert_eq!(err, Some(WorkflowError::UnknownNode(NodeId::ParameterExtraction)));
    }

    #[test]
    fn test_next_follows_edges() {
        let graph = GraphBuilder::new()
            .add_node(noop(NodeId::Router))
            .add_node(noop(NodeId::Error))
            .add_node(noop(NodeId::FormatResponse))
            .add_conditional_edges(
                NodeId::Router,
                vec![NodeId::FormatResponse, NodeId::Error],
                |_| Ok(vec![NodeId::FormatResponse]),
            )
            .add_end(NodeId::FormatResponse)
            .add_end(NodeId::Error)
            .set_entry(NodeId::Router)
            .compile()
            .unwrap();

        let state = AgentState::initial("s", "chat", "hi").unwrap();
        assert_eq!(graph.next(NodeId::Router, &state), vec![NodeId::FormatResponse]);
        assert!(graph.next(NodeId::FormatResponse, &state).is_empty());
    }
}
