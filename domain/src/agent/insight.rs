//! Records agents leave in shared state

use super::decision::AgentDecision;
use super::role::AgentKind;
use crate::tool::kind::ToolKind;
use serde::{Deserialize, Serialize};

/// An agent's analysis of the query and its tool selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentInsight {
    pub agent_name: String,
    pub role: String,
    pub query_analysis: String,
    pub selected_tools: Vec<ToolKind>,
    pub reasoning: String,
    pub confidence: f64,
}

impl AgentInsight {
    pub fn from_decision(agent: AgentKind, decision: &AgentDecision) -> Self {
        let tools: Vec<&str> = decision.selected_tools.iter().map(ToolKind::as_str).collect();
        Self {
            agent_name: agent.as_str().to_string(),
            role: agent.define_role().role.to_string(),
            query_analysis: format!("Query requires {}", tools.join(", ")),
            selected_tools: decision.selected_tools.clone(),
            reasoning: decision.reasoning.clone(),
            confidence: decision.confidence,
        }
    }
}

/// Marks an agent that ended its branch without selecting any tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentNotice {
    pub agent: AgentKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AgentNotice {
    pub fn no_suitable_tool(agent: AgentKind, detail: Option<String>) -> Self {
        Self {
            agent,
            message: format!(
                "{}: No suitable tools found for this query",
                agent.define_role().role
            ),
            detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_from_decision() {
        let decision = AgentDecision {
            selected_tools: vec![ToolKind::Faq, ToolKind::BookRecommendation],
            reasoning: "needs both".to_string(),
            confidence: 0.7,
        };
        let insight = AgentInsight::from_decision(AgentKind::General, &decision);
        assert_eq!(insight.agent_name, "general_agent");
        assert_eq!(insight.role, "General Query Handler");
        assert_eq!(
            insight.query_analysis,
            "Query requires faq_tool, book_recommendation_tool"
        );
    }

    #[test]
    fn test_no_suitable_tool_message() {
        let notice = AgentNotice::no_suitable_tool(AgentKind::GeneralVoice, None);
        assert_eq!(
            notice.message,
            "Voice Interface Specialist: No suitable tools found for this query"
        );
    }
}
