//! Conditional edge functions and the safe routing adapter
//!
//! Every routing function returns `Result<Vec<NodeId>, RoutingError>`; the
//! graph only ever calls them through [`safe_route`], which turns errors,
//! panics, empty results and undeclared targets into `[NodeId::Error]`.

use seeker_domain::{AgentKind, AgentState, NodeId, RoutingError};
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::{debug, warn};

/// Evaluate `route` without letting any failure escape.
pub fn safe_route<F>(from: NodeId, route: &F, allowed: &[NodeId], state: &AgentState) -> Vec<NodeId>
where
    F: Fn(&AgentState) -> Result<Vec<NodeId>, RoutingError> + ?Sized,
{
    let result = catch_unwind(AssertUnwindSafe(|| route(state)))
        .unwrap_or_else(|payload| Err(RoutingError::Panicked(panic_message(payload.as_ref()))));

    let targets = match result {
        Ok(targets) if targets.is_empty() => {
            warn!(from = %from, "Routing produced no targets");
            return vec![NodeId::Error];
        }
        Ok(targets) => targets,
        Err(e) => {
            warn!(from = %from, error = %e, "Routing failed");
            return vec![NodeId::Error];
        }
    };

    if let Some(stray) = targets.iter().find(|t| !allowed.contains(t)) {
        warn!(from = %from, target = %stray, "Routing target not declared for this edge");
        return vec![NodeId::Error];
    }

    let mut unique: Vec<NodeId> = Vec::with_capacity(targets.len());
    for target in targets {
        if !unique.contains(&target) {
            unique.push(target);
        }
    }
    debug!(from = %from, to = ?unique, "Routed");
    unique
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// `router_node` continues to parameter extraction only with an analysis
pub fn route_after_router(state: &AgentState) -> Result<Vec<NodeId>, RoutingError> {
    if state.has_fault(NodeId::Router) || state.shared_data.routing_analysis.is_none() {
        return Err(RoutingError::MissingAnalysis);
    }
    Ok(vec![NodeId::ParameterExtraction])
}

/// Dispatch on `routing_analysis.next_node`: one agent or the coordinator
pub fn route_after_parameters(state: &AgentState) -> Result<Vec<NodeId>, RoutingError> {
    if state.has_fault(NodeId::ParameterExtraction) {
        return Ok(vec![NodeId::Error]);
    }
    let analysis = state
        .shared_data
        .routing_analysis
        .as_ref()
        .ok_or(RoutingError::MissingAnalysis)?;
    Ok(vec![analysis.target()?])
}

/// Fan out to every participating agent
pub fn route_after_coordinator(state: &AgentState) -> Result<Vec<NodeId>, RoutingError> {
    if state.has_fault(NodeId::AgentCoordinator) {
        return Ok(vec![NodeId::Error]);
    }
    let agents = state
        .shared_data
        .participating_agents_for_parallel
        .as_deref()
        .unwrap_or_default();
    if agents.is_empty() {
        return Err(RoutingError::NoParticipants);
    }
    Ok(agents.iter().map(|a| NodeId::Agent(*a)).collect())
}

/// Fan out to the tools `agent` selected that it is allowed to run.
///
/// An agent that ended on the "no suitable tool" path goes straight to
/// `merge_tools` so its notice reaches the formatter.
pub fn route_after_agent(
    agent: AgentKind,
) -> impl Fn(&AgentState) -> Result<Vec<NodeId>, RoutingError> + Send + Sync + 'static {
    move |state: &AgentState| {
        let node = NodeId::Agent(agent);
        if state.has_fault(node) {
            return Ok(vec![NodeId::Error]);
        }
        let shared = &state.shared_data;
        if shared.notice_for(agent).is_some() {
            return Ok(vec![NodeId::MergeTools]);
        }

        let selected = shared
            .insight_for(agent)
            .map(|insight| insight.selected_tools.as_slice())
            .or(shared.selected_tools_for_parallel.as_deref())
            .unwrap_or_default();
        let tools: Vec<NodeId> = selected
            .iter()
            .filter(|tool| agent.available_tools().contains(tool))
            .map(|tool| NodeId::Tool(*tool))
            .collect();

        if tools.is_empty() {
            return Err(RoutingError::NoExecutableTools(agent.to_string()));
        }
        Ok(tools)
    }
}
