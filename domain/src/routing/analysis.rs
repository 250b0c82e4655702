//! Router decisions

use super::error::RoutingError;
use super::node::NodeId;
use crate::agent::role::AgentKind;
use crate::core::string::{non_blank, truncate_words};
use crate::state::entities::Interface;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Maximum number of words kept from the router's reasoning
pub const MAX_REASONING_WORDS: usize = 50;

/// Confidence used when the router omits one or sends a non-number
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Intents the router detected, grouped by kind.
///
/// Entries are kept as raw JSON; only their counts feed later prompts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryIntents {
    pub faq_requests: Vec<Value>,
    pub book_recommendations: Vec<Value>,
    pub product_inquiries: Vec<Value>,
    pub sales_requests: Vec<Value>,
}

impl QueryIntents {
    pub fn total(&self) -> usize {
        self.faq_requests.len()
            + self.book_recommendations.len()
            + self.product_inquiries.len()
            + self.sales_requests.len()
    }
}

/// Validated routing decision for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingAnalysis {
    pub next_node: String,
    #[serde(default)]
    pub participating_agents: Vec<String>,
    #[serde(default)]
    pub is_multi_purpose: bool,
    #[serde(default)]
    pub is_multi_agent: bool,
    #[serde(default)]
    pub query_intents: QueryIntents,
    #[serde(default)]
    pub reasoning: Option<String>,
    pub confidence: f64,
}

impl RoutingAnalysis {
    /// Build an analysis from the router's JSON object, normalizing every field.
    ///
    /// `next_node` is the only required field; there is no default route.
    pub fn from_json(map: &Map<String, Value>) -> Result<Self, RoutingError> {
        let next_node = map
            .get("next_node")
            .and_then(Value::as_str)
            .and_then(non_blank)
            .ok_or(RoutingError::MissingNextNode)?;

        let participating_agents = map
            .get("participating_agents")
            .and_then(Value::as_array)
            .map(|agents| {
                agents
                    .iter()
                    .filter_map(Value::as_str)
                    .filter_map(non_blank)
                    .collect()
            })
            .unwrap_or_default();

        let query_intents = map
            .get("query_intents")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default();

        let reasoning = map
            .get("reasoning")
            .and_then(Value::as_str)
            .and_then(non_blank)
            .map(|r| truncate_words(&r, MAX_REASONING_WORDS));

        Ok(Self {
            next_node,
            participating_agents,
            is_multi_purpose: map
                .get("is_multi_purpose")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            is_multi_agent: map
                .get("is_multi_agent")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            query_intents,
            reasoning,
            confidence: normalize_confidence(map.get("confidence")),
        })
    }

    /// Whether the query needs the coordinator to fan out to several agents
    pub fn requires_coordination(&self) -> bool {
        self.is_multi_agent && self.participating_agents.len() > 1
    }

    pub fn agent_count(&self) -> usize {
        self.participating_agents.len()
    }

    /// Resolve the decision against the request interface and enabled agents.
    ///
    /// Participants that are disabled or cannot serve `interface` are dropped.
    /// A `next_node` naming such an agent is an error. A single-agent decision
    /// with no surviving participants falls back to `[next_node]`.
    pub fn resolve_for_interface(
        mut self,
        interface: Interface,
        enabled: &[AgentKind],
    ) -> Result<Self, RoutingError> {
        if let Ok(agent) = self.next_node.parse::<AgentKind>() {
            if !enabled.contains(&agent) {
                return Err(RoutingError::DisabledAgent(self.next_node));
            }
            if !agent.supports(interface) {
                return Err(RoutingError::IncompatibleAgent {
                    agent: self.next_node,
                    interface,
                });
            }
        }

        self.participating_agents.retain(|name| match name.parse::<AgentKind>() {
            Ok(agent) => enabled.contains(&agent) && agent.supports(interface),
            // Unknown names stay; the coordinator's edge rejects them
            Err(_) => true,
        });
        let mut seen: Vec<String> = Vec::new();
        self.participating_agents.retain(|name| {
            let fresh = !seen.contains(name);
            if fresh {
                seen.push(name.clone());
            }
            fresh
        });

        if self.participating_agents.is_empty() && self.next_node.parse::<AgentKind>().is_ok() {
            self.participating_agents.push(self.next_node.clone());
        }
        Ok(self)
    }

    /// Node selected by `next_node`: a specific agent or the coordinator
    pub fn target(&self) -> Result<NodeId, RoutingError> {
        match self.next_node.parse::<NodeId>() {
            Ok(node @ (NodeId::Agent(_) | NodeId::AgentCoordinator)) => Ok(node),
            _ => Err(RoutingError::UnknownTarget(self.next_node.clone())),
        }
    }
}

fn normalize_confidence(raw: Option<&Value>) -> f64 {
    let value = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match value {
        Some(v) if v.is_finite() => v.clamp(0.0, 1.0),
        _ => DEFAULT_CONFIDENCE,
    }
}
