//! Prompt templates for the workflow's language model calls

use crate::agent::role::AgentKind;
use crate::state::entities::Interface;
use crate::tool::book::{BookRecord, BookSearchCriteria};
use crate::tool::kind::ToolKind;

/// Templates for generating prompts at each analysis step
pub struct PromptTemplate;

impl PromptTemplate {
    /// Routing prompt: pick the agent(s) for a query on a given interface
    pub fn router_prompt(query: &str, interface: Interface, agents: &[AgentKind]) -> String {
        let mut agent_lines = String::new();
        for agent in agents {
            let role = agent.define_role();
            let interfaces = match role.interfaces {
                [only] => format!("{} only", only.as_str().to_uppercase()),
                many => many
                    .iter()
                    .map(|i| i.as_str().to_uppercase())
                    .collect::<Vec<_>>()
                    .join(" + "),
            };
            let tools: Vec<&str> = role.available_tools.iter().map(ToolKind::as_str).collect();
            agent_lines.push_str(&format!(
                "- {} ({}, {}): {}. Tools: {}\n",
                role.name,
                interfaces,
                role.role,
                role.description,
                tools.join(", ")
            ));
        }

        let tool_lines: String = ToolKind::all()
            .iter()
            .map(|tool| format!("- {}: {}\n", tool.as_str(), tool.description()))
            .collect();

        format!(
            r#"You route customer requests for a children's bookstore assistant.

Query: "{query}"
Interface: {interface}

Available agents:
{agent_lines}
Interface rules:
- Only route to agents that support the "{interface}" interface.
- Never route a voice request to a chat-only agent or a chat request to a voice-only agent.
- Never select two agents that serve the same interface for the same need.
- When more than one agent is needed, set "next_node" to "agent_coordinator" and list them in "participating_agents".

Available tools:
{tool_lines}
Return only a JSON object:
{{
    "next_node": "agent name or agent_coordinator",
    "participating_agents": ["agent names"],
    "is_multi_purpose": false,
    "is_multi_agent": false,
    "query_intents": {{
        "faq_requests": [],
        "book_recommendations": [],
        "product_inquiries": [],
        "sales_requests": []
    }},
    "reasoning": "short explanation",
    "confidence": 0.9
}}"#
        )
    }

    /// Parameter extraction prompt for every tool's inputs
    pub fn parameter_extraction_prompt(query: &str) -> String {
        format!(
            r#"Extract tool parameters from the user query below.

Query: "{query}"

Parameters:
1. FAQ tool: faq_query (the question or topic)
2. Book recommendation tool: age, age_from, age_to, genre, budget, purpose
3. Book details tool: title, author, isbn

Age handling:
- A single age ("for a 10-year-old") sets "age" and leaves "age_from"/"age_to" null.
- A range ("ages 6-9", "between 6 and 9", "6 to 9 years old") sets "age_from"/"age_to" and leaves "age" null.

Only include parameters the query actually mentions; use null otherwise.
Return only a JSON object:
{{
    "faq_query": null,
    "age": null,
    "age_from": null,
    "age_to": null,
    "genre": null,
    "budget": null,
    "purpose": null,
    "title": null,
    "author": null,
    "isbn": null
}}"#
        )
    }

    /// Justification prompt for a batch of recommended books
    pub fn explanation_prompt(books: &[BookRecord], criteria: &BookSearchCriteria) -> String {
        let age = match (criteria.age_from, criteria.age_to) {
            (Some(from), Some(to)) if from == to => from.to_string(),
            (Some(from), Some(to)) => format!("{from}-{to}"),
            _ => "Any".to_string(),
        };
        let budget = criteria
            .budget
            .map(|b| format!("${b:.2}"))
            .unwrap_or_else(|| "Any".to_string());

        let books_text = books
            .iter()
            .map(|book| {
                format!(
                    "Book ID: {}\nTitle: {}\nAuthor: {}\nAge Range: {}\nPurpose: {}\nDescription: {}\nPrice: ${:.2}",
                    book.id,
                    book.title,
                    book.author,
                    book.age_label(),
                    book.purpose.as_deref().unwrap_or("general"),
                    book.description.as_deref().unwrap_or("No description available"),
                    book.price
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            r#"Explain in one or two sentences why each book suits this reader.
Write each explanation as a phrase that completes "This book is ...".

Reader preferences:
- Age: {age}
- Purpose: {purpose}
- Budget: {budget}
- Genre: {genre}
- Query: {query}

Books:
{books_text}

Answer with one block per book:
[BOOK_ID:<id>]
explanation
[/BOOK_ID]"#,
            purpose = criteria.purpose.as_deref().unwrap_or("Any"),
            genre = criteria.genre.as_deref().unwrap_or("Any"),
            query = criteria.query_text.as_deref().unwrap_or("None"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_prompt_lists_enabled_agents_only() {
        let prompt = PromptTemplate::router_prompt(
            "books for my son",
            Interface::Voice,
            &[AgentKind::General, AgentKind::GeneralVoice],
        );
        assert!(prompt.contains("Interface: voice"));
        assert!(prompt.contains("- general_agent (CHAT only"));
        assert!(prompt.contains("- general_voice_agent (VOICE only"));
        assert!(!prompt.contains("sales_agent"));
        assert!(prompt.contains("agent_coordinator"));
        assert!(prompt.contains("faq_tool"));
    }

    #[test]
    fn test_extraction_prompt_mentions_every_key() {
        let prompt = PromptTemplate::parameter_extraction_prompt("a dragon book");
        for key in [
            "faq_query", "age", "age_from", "age_to", "genre", "budget", "purpose", "title",
            "author", "isbn",
        ] {
            assert!(prompt.contains(&format!("\"{key}\"")), "missing {key}");
        }
    }

    #[test]
    fn test_explanation_prompt_uses_tags() {
        let book = BookRecord {
            id: 7,
            title: "Dragon Rider".to_string(),
            author: "Cornelia Funke".to_string(),
            price: 9.5,
            ..Default::default()
        };
        let criteria = BookSearchCriteria {
            age_from: Some(8),
            age_to: Some(10),
            ..Default::default()
        };
        let prompt = PromptTemplate::explanation_prompt(&[book], &criteria);
        assert!(prompt.contains("Book ID: 7"));
        assert!(prompt.contains("Age: 8-10"));
        assert!(prompt.contains("[BOOK_ID:<id>]"));
        assert!(prompt.contains("Price: $9.50"));
    }
}
