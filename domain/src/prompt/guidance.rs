//! Composable guidance fragments for agent analysis prompts

use crate::agent::role::{AgentProfile, RouterContext};
use crate::tool::kind::ToolKind;

/// A reusable block of prompt guidance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentGuidance {
    General,
    Faq,
    BookRecommendation,
    Sales,
    Voice,
}

impl AgentGuidance {
    pub fn text(&self) -> &'static str {
        match self {
            AgentGuidance::General => {
                "General guidance:
- Read the query carefully and identify every user need in it
- Select only tools that directly serve one of those needs
- Take the router analysis into account
- Explain your selection briefly"
            }
            AgentGuidance::Faq => {
                "FAQ guidance:
- Use the FAQ tool for store policy and customer service questions
- Typical topics: opening hours, returns, shipping, payment, membership"
            }
            AgentGuidance::BookRecommendation => {
                "Book recommendation guidance:
- Use the book recommendation tool when the user wants reading suggestions
- Age, genre, budget or purpose hints all indicate a recommendation request"
            }
            AgentGuidance::Sales => {
                "Sales guidance:
- Use the book details tool for questions about a specific title
- Typical topics: price, availability, author, ISBN"
            }
            AgentGuidance::Voice => {
                "Voice interface guidance:
- The answer will be spoken aloud
- Prefer a single, focused tool selection over several partial ones"
            }
        }
    }
}

/// Standard analysis prompt: role, tools, router context, query, guidance, output format
pub fn compose_analysis_prompt(profile: &AgentProfile, query: &str, context: &RouterContext) -> String {
    let role = &profile.role;
    let tools: Vec<&str> = role.available_tools.iter().map(ToolKind::as_str).collect();
    let guidance: Vec<&str> = profile.guidance.iter().map(AgentGuidance::text).collect();

    format!(
        r#"You are a {role_name} with expertise in: {expertise}

Available tools: {tools}

{context}

Analyze this user query: "{query}"

Determine which of your tools are needed, why, and how confident you are (0.0 to 1.0).
If the router marked this as a multi-agent query, focus on your own expertise.
If it is a multi-purpose query handled by you alone, select every relevant tool.
If none of your tools fit, return an empty "selected_tools" list.

{guidance}

Return only a JSON object:
{{
    "selected_tools": ["tool names"],
    "reasoning": "explanation",
    "confidence": 0.85
}}"#,
        role_name = role.role,
        expertise = role.expertise.join(", "),
        tools = tools.join(", "),
        context = context.summary(),
        guidance = guidance.join("\n\n"),
    )
}
