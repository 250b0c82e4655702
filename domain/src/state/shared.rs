//! Cross-node working data and its merge reducer

use super::fault::NodeFault;
use crate::agent::insight::{AgentInsight, AgentNotice};
use crate::agent::role::AgentKind;
use crate::params::extraction::ExtractedParameters;
use crate::routing::analysis::RoutingAnalysis;
use crate::tool::failure::ToolFailure;
use crate::tool::kind::ToolKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-node execution counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMetrics {
    pub invocations: u64,
    pub total_duration_ms: u64,
}

impl NodeMetrics {
    pub fn single(duration_ms: u64) -> Self {
        Self {
            invocations: 1,
            total_duration_ms: duration_ms,
        }
    }

    pub fn combine(self, other: NodeMetrics) -> NodeMetrics {
        NodeMetrics {
            invocations: self.invocations.saturating_add(other.invocations),
            total_duration_ms: self.total_duration_ms.saturating_add(other.total_duration_ms),
        }
    }
}

/// Data shared between nodes of one request.
///
/// Used both as the accumulated value and as a delta: a node sets only the
/// fields it produced and leaves the rest at their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharedData {
    pub extracted_parameters: Option<ExtractedParameters>,
    pub routing_analysis: Option<RoutingAnalysis>,
    pub correlation_id: Option<String>,
    pub current_agent_role: Option<AgentKind>,
    pub agent_insights: Vec<AgentInsight>,
    pub selected_tools_for_parallel: Option<Vec<ToolKind>>,
    pub participating_agents_for_parallel: Option<Vec<AgentKind>>,
    pub agent_notices: Vec<AgentNotice>,
    pub tool_failures: Vec<ToolFailure>,
    pub node_faults: Vec<NodeFault>,
    pub access_count: u64,
    pub last_accessed: Option<DateTime<Utc>>,
    pub performance_metrics: BTreeMap<String, NodeMetrics>,
}

impl SharedData {
    /// Insight recorded by `agent`, if any
    pub fn insight_for(&self, agent: AgentKind) -> Option<&AgentInsight> {
        self.agent_insights
            .iter()
            .find(|i| i.agent_name == agent.as_str())
    }

    pub fn notice_for(&self, agent: AgentKind) -> Option<&AgentNotice> {
        self.agent_notices.iter().find(|n| n.agent == agent)
    }
}

/// Merge a delta into accumulated shared data.
///
/// - optional scalars: the right side wins when present
/// - `agent_insights`: entries whose agent name is already present are dropped
/// - notices, tool failures, node faults: first entry per key is kept
/// - counters: summed, `last_accessed` takes the later timestamp
pub fn merge_shared_data(left: &SharedData, right: &SharedData) -> SharedData {
    let mut performance_metrics = left.performance_metrics.clone();
    for (node, metrics) in &right.performance_metrics {
        let entry = performance_metrics.entry(node.clone()).or_default();
        *entry = entry.combine(*metrics);
    }

    SharedData {
        extracted_parameters: right
            .extracted_parameters
            .clone()
            .or_else(|| left.extracted_parameters.clone()),
        routing_analysis: right
            .routing_analysis
            .clone()
            .or_else(|| left.routing_analysis.clone()),
        correlation_id: right
            .correlation_id
            .clone()
            .or_else(|| left.correlation_id.clone()),
        current_agent_role: right.current_agent_role.or(left.current_agent_role),
        agent_insights: union_by(&left.agent_insights, &right.agent_insights, |i| {
            i.agent_name.clone()
        }),
        selected_tools_for_parallel: right
            .selected_tools_for_parallel
            .clone()
            .or_else(|| left.selected_tools_for_parallel.clone()),
        participating_agents_for_parallel: right
            .participating_agents_for_parallel
            .clone()
            .or_else(|| left.participating_agents_for_parallel.clone()),
        agent_notices: union_by(&left.agent_notices, &right.agent_notices, |n| n.agent),
        tool_failures: union_by(&left.tool_failures, &right.tool_failures, |f| f.tool),
        node_faults: union_by(&left.node_faults, &right.node_faults, |f| f.node),
        access_count: left.access_count.saturating_add(right.access_count),
        last_accessed: left.last_accessed.max(right.last_accessed),
        performance_metrics,
    }
}

fn union_by<T, K, F>(left: &[T], right: &[T], key: F) -> Vec<T>
where
    T: Clone,
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut merged: Vec<T> = left.to_vec();
    for item in right {
        let k = key(item);
        if !merged.iter().any(|existing| key(existing) == k) {
            merged.push(item.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fault::FaultKind;
    use crate::routing::node::NodeId;

    fn insight(agent: &str, reasoning: &str) -> AgentInsight {
        AgentInsight {
            agent_name: agent.to_string(),
            role: "role".to_string(),
            query_analysis: "Query requires faq_tool".to_string(),
            selected_tools: vec![ToolKind::Faq],
            reasoning: reasoning.to_string(),
            confidence: 0.8,
        }
    }

    #[test]
    fn test_scalars_right_wins_when_present() {
        let left = SharedData {
            correlation_id: Some("left".to_string()),
            current_agent_role: Some(AgentKind::General),
            ..Default::default()
        };
        let right = SharedData {
            correlation_id: Some("right".to_string()),
            ..Default::default()
        };

        let merged = merge_shared_data(&left, &right);
        assert_eq!(merged.correlation_id.as_deref(), Some("right"));
        assert_eq!(merged.current_agent_role, Some(AgentKind::General));
    }

    #[test]
    fn test_existing_insight_is_not_replaced() {
        let left = SharedData {
            agent_insights: vec![insight("general_agent", "first")],
            ..Default::default()
        };
        let right = SharedData {
            agent_insights: vec![insight("general_agent", "second")],
            ..Default::default()
        };

        let merged = merge_shared_data(&left, &right);
        assert_eq!(merged.agent_insights.len(), 1);
        assert_eq!(merged.agent_insights[0].reasoning, "first");
        assert_eq!(merge_shared_data(&merged, &right), merged);
    }

    #[test]
    fn test_new_insight_is_appended() {
        let left = SharedData {
            agent_insights: vec![insight("general_agent", "chat")],
            ..Default::default()
        };
        let right = SharedData {
            agent_insights: vec![insight("sales_agent", "sales")],
            ..Default::default()
        };

        let merged = merge_shared_data(&left, &right);
        let names: Vec<&str> = merged
            .agent_insights
            .iter()
            .map(|i| i.agent_name.as_str())
            .collect();
        assert_eq!(names, vec!["general_agent", "sales_agent"]);
    }

    #[test]
    fn test_counters_accumulate() {
        let earlier = Utc::now() - chrono::Duration::seconds(30);
        let later = Utc::now();
        let mut left_metrics = BTreeMap::new();
        left_metrics.insert("router_node".to_string(), NodeMetrics::single(10));
        let mut right_metrics = BTreeMap::new();
        right_metrics.insert("router_node".to_string(), NodeMetrics::single(5));
        right_metrics.insert("faq_tool".to_string(), NodeMetrics::single(7));

        let left = SharedData {
            access_count: 2,
            last_accessed: Some(later),
            performance_metrics: left_metrics,
            ..Default::default()
        };
        let right = SharedData {
            access_count: 1,
            last_accessed: Some(earlier),
            performance_metrics: right_metrics,
            ..Default::default()
        };

        let merged = merge_shared_data(&left, &right);
        assert_eq!(merged.access_count, 3);
        assert_eq!(merged.last_accessed, Some(later));
        assert_eq!(merged.performance_metrics["router_node"].invocations, 2);
        assert_eq!(merged.performance_metrics["router_node"].total_duration_ms, 15);
        assert_eq!(merged.performance_metrics["faq_tool"].invocations, 1);
    }

    #[test]
    fn test_faults_unique_per_node() {
        let fault = NodeFault::new(NodeId::Router, FaultKind::Routing, "missing next_node");
        let delta = SharedData {
            node_faults: vec![fault],
            ..Default::default()
        };
        let once = merge_shared_data(&SharedData::default(), &delta);
        let twice = merge_shared_data(&once, &delta);
        assert_eq!(twice.node_faults.len(), 1);
    }

    #[test]
    fn test_insight_lookup() {
        let data = SharedData {
            agent_insights: vec![insight("general_voice_agent", "voice")],
            ..Default::default()
        };
        assert!(data.insight_for(AgentKind::GeneralVoice).is_some());
        assert!(data.insight_for(AgentKind::General).is_none());
    }
}
