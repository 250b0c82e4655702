//! Agent roles and their lookup table

use crate::core::error::DomainError;
use crate::prompt::guidance::{AgentGuidance, compose_analysis_prompt};
use crate::routing::analysis::RoutingAnalysis;
use crate::state::entities::Interface;
use crate::tool::kind::ToolKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgentKind {
    #[serde(rename = "general_agent")]
    General,
    #[serde(rename = "general_voice_agent")]
    GeneralVoice,
    #[serde(rename = "sales_agent")]
    Sales,
}

/// Static description of what an agent is and what it may use
#[derive(Debug)]
pub struct AgentRole {
    pub name: &'static str,
    pub role: &'static str,
    pub description: &'static str,
    pub expertise: &'static [&'static str],
    pub available_tools: &'static [ToolKind],
    pub interfaces: &'static [Interface],
}

/// Prompt builder signature shared by all agents
pub type PromptBuilder = fn(&AgentProfile, &str, &RouterContext) -> String;

/// One row of the agent lookup table
#[derive(Debug)]
pub struct AgentProfile {
    pub kind: AgentKind,
    pub role: AgentRole,
    pub guidance: &'static [AgentGuidance],
    pub build_prompt: PromptBuilder,
}

static PROFILES: [AgentProfile; 3] = [
    AgentProfile {
        kind: AgentKind::General,
        role: AgentRole {
            name: "general_agent",
            role: "General Query Handler",
            description: "Handles FAQ questions and book recommendations for chat users",
            expertise: &["FAQ handling", "Book recommendations", "General inquiries"],
            available_tools: &[ToolKind::Faq, ToolKind::BookRecommendation],
            interfaces: &[Interface::Chat],
        },
        guidance: &[
            AgentGuidance::General,
            AgentGuidance::Faq,
            AgentGuidance::BookRecommendation,
        ],
        build_prompt: compose_analysis_prompt,
    },
    AgentProfile {
        kind: AgentKind::GeneralVoice,
        role: AgentRole {
            name: "general_voice_agent",
            role: "Voice Interface Specialist",
            description: "Handles book recommendations for voice users",
            expertise: &["Voice interaction", "Book recommendations", "Conversational flow"],
            available_tools: &[ToolKind::BookRecommendation],
            interfaces: &[Interface::Voice],
        },
        guidance: &[
            AgentGuidance::General,
            AgentGuidance::BookRecommendation,
            AgentGuidance::Voice,
        ],
        build_prompt: compose_analysis_prompt,
    },
    AgentProfile {
        kind: AgentKind::Sales,
        role: AgentRole {
            name: "sales_agent",
            role: "Sales Specialist",
            description: "Answers product, pricing and availability questions",
            expertise: &["Product information", "Pricing", "Availability"],
            available_tools: &[ToolKind::BookDetails],
            interfaces: &[Interface::Chat, Interface::Voice],
        },
        guidance: &[AgentGuidance::General, AgentGuidance::Sales],
        build_prompt: compose_analysis_prompt,
    },
];

impl AgentKind {
    pub fn all() -> [AgentKind; 3] {
        [AgentKind::General, AgentKind::GeneralVoice, AgentKind::Sales]
    }

    /// Agents enabled when configuration does not say otherwise
    pub fn default_enabled() -> Vec<AgentKind> {
        vec![AgentKind::General, AgentKind::GeneralVoice]
    }

    pub fn profile(&self) -> &'static AgentProfile {
        let index = match self {
            AgentKind::General => 0,
            AgentKind::GeneralVoice => 1,
            AgentKind::Sales => 2,
        };
        &PROFILES[index]
    }

    pub fn define_role(&self) -> &'static AgentRole {
        &self.profile().role
    }

    pub fn as_str(&self) -> &'static str {
        self.define_role().name
    }

    pub fn available_tools(&self) -> &'static [ToolKind] {
        self.define_role().available_tools
    }

    pub fn supports(&self, interface: Interface) -> bool {
        self.define_role().interfaces.contains(&interface)
    }

    pub fn build_prompt(&self, query: &str, context: &RouterContext) -> String {
        let profile = self.profile();
        (profile.build_prompt)(profile, query, context)
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        AgentKind::all()
            .into_iter()
            .find(|agent| agent.as_str() == name)
            .ok_or_else(|| DomainError::UnknownAgent(s.to_string()))
    }
}

/// Summary of the router's decision handed to agent prompts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouterContext {
    pub is_multi_agent: bool,
    pub is_multi_purpose: bool,
    pub participating_agents: Vec<String>,
    pub faq_requests: usize,
    pub book_recommendations: usize,
    pub product_inquiries: usize,
    pub sales_requests: usize,
    pub reasoning: Option<String>,
    pub confidence: Option<f64>,
}

impl RouterContext {
    pub fn from_analysis(analysis: Option<&RoutingAnalysis>) -> Self {
        let Some(analysis) = analysis else {
            return Self::default();
        };
        let intents = &analysis.query_intents;
        Self {
            is_multi_agent: analysis.is_multi_agent,
            is_multi_purpose: analysis.is_multi_purpose,
            participating_agents: analysis.participating_agents.clone(),
            faq_requests: intents.faq_requests.len(),
            book_recommendations: intents.book_recommendations.len(),
            product_inquiries: intents.product_inquiries.len(),
            sales_requests: intents.sales_requests.len(),
            reasoning: analysis.reasoning.clone(),
            confidence: Some(analysis.confidence),
        }
    }

    /// Text block embedded in agent prompts
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Router analysis:".to_string(),
            format!(
                "- Multi-agent query: {}",
                if self.is_multi_agent { "yes" } else { "no" }
            ),
            format!(
                "- Multi-purpose query: {}",
                if self.is_multi_purpose { "yes" } else { "no" }
            ),
        ];
        if !self.participating_agents.is_empty() {
            lines.push(format!(
                "- Participating agents: {}",
                self.participating_agents.join(", ")
            ));
        }
        lines.push(format!(
            "- Detected intents: {} FAQ, {} book recommendation, {} product inquiry, {} sales",
            self.faq_requests, self.book_recommendations, self.product_inquiries, self.sales_requests
        ));
        if let Some(reasoning) = &self.reasoning {
            lines.push(format!("- Router reasoning: {reasoning}"));
        }
        if let Some(confidence) = self.confidence {
            lines.push(format!("- Router confidence: {confidence:.2}"));
        }
        lines.join("\n")
    }
}
