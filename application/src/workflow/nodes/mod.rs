//! Workflow node implementations

pub mod agent;
pub mod book_details;
pub mod coordinator;
pub mod error;
pub mod faq;
pub mod format;
pub mod merge;
pub mod parameters;
pub mod recommendation;
pub mod router;

use crate::ports::tool_backend::CapabilityError;
use seeker_domain::{AgentResults, Command, Message, MessageKind, NodeId, SharedData, ToolFailure, ToolKind};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Failure inside a tool node; always confined to that tool's branch
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Capability(#[from] CapabilityError),
}

impl ToolError {
    fn into_failure(self, tool: ToolKind) -> ToolFailure {
        match self {
            ToolError::Validation(detail) => ToolFailure::validation(tool, detail),
            ToolError::Capability(e) => ToolFailure::execution(tool, e.to_string()),
        }
    }
}

/// Bound a capability call by `timeout`
pub(crate) async fn with_timeout<T, F>(timeout: Duration, call: F) -> Result<T, CapabilityError>
where
    F: Future<Output = Result<T, CapabilityError>>,
{
    tokio::time::timeout(timeout, call)
        .await
        .unwrap_or(Err(CapabilityError::Timeout))
}

/// Delta of a finished tool: a filled result slot and a renderable fragment,
/// or a tagged failure fragment.
pub(crate) fn tool_command(
    tool: ToolKind,
    outcome: Result<(AgentResults, String), ToolError>,
) -> Command {
    let node = NodeId::Tool(tool);
    match outcome {
        Ok((results, fragment)) => Command::new()
            .with_message(
                Message::tool(node, format!("{tool} executed successfully"))
                    .with_metadata("fragment", fragment),
            )
            .with_agent_results(results)
            .with_current_agent(node.as_str()),
        Err(e) => {
            let failure = e.into_failure(tool);
            warn!(tool = %tool, error = %failure.detail, "Tool failed");
            Command::new()
                .with_message(
                    Message::system(node, MessageKind::ToolError, failure.fragment())
                        .with_metadata("fragment", failure.fragment())
                        .with_metadata("failure_kind", serde_json::to_value(failure.kind).unwrap_or_default()),
                )
                .with_shared_data(SharedData {
                    tool_failures: vec![failure],
                    ..Default::default()
                })
                .with_current_agent(node.as_str())
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Fakes shared by the node tests

    use crate::ports::llm_gateway::{Completion, CompletionRequest, GatewayError, LlmGateway};
    use crate::ports::tool_backend::{BookCatalogPort, CapabilityError, FaqSearchPort};
    use async_trait::async_trait;
    use seeker_domain::{BookLookup, BookRecord, BookSearchCriteria, FaqEntry, FaqMatch};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    pub struct ScriptedGateway {
        replies: Mutex<VecDeque<Result<String, GatewayError>>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGateway {
        pub fn new(replies: Vec<Result<String, GatewayError>>) -> Self {
            Self {
                replies: Mutex::new(VecDeque::from(replies)),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn ok(replies: &[&str]) -> Self {
            Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        fn model_name(&self) -> &str {
            "scripted"
        }

        async fn invoke(&self, request: &CompletionRequest) -> Result<Completion, GatewayError> {
            self.prompts.lock().unwrap().push(request.prompt.clone());
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::Other("No more responses".to_string())))?;
            Ok(Completion { content: reply })
        }
    }

    /// Answers by prompt content, for nodes that call the model concurrently.
    ///
    /// The first rule whose needle occurs in the prompt wins.
    pub struct KeyedGateway {
        rules: Vec<(&'static str, &'static str)>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl KeyedGateway {
        pub fn new(rules: &[(&'static str, &'static str)]) -> Self {
            Self {
                rules: rules.to_vec(),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmGateway for KeyedGateway {
        fn model_name(&self) -> &str {
            "keyed"
        }

        async fn invoke(&self, request: &CompletionRequest) -> Result<Completion, GatewayError> {
            self.prompts.lock().unwrap().push(request.prompt.clone());
            self.rules
                .iter()
                .find(|(needle, _)| request.prompt.contains(needle))
                .map(|(_, reply)| Completion {
                    content: reply.to_string(),
                })
                .ok_or_else(|| GatewayError::Other("No rule matches the prompt".to_string()))
        }
    }

    #[derive(Default)]
    pub struct FakeFaq {
        pub semantic: Vec<FaqMatch>,
        pub keyword: Vec<FaqEntry>,
        pub fail: bool,
    }

    #[async_trait]
    impl FaqSearchPort for FakeFaq {
        async fn semantic_search(
            &self,
            _query: &str,
            top_k: usize,
            _threshold: f64,
        ) -> Result<Vec<FaqMatch>, CapabilityError> {
            if self.fail {
                return Err(CapabilityError::Unavailable("index offline".to_string()));
            }
            Ok(self.semantic.iter().take(top_k).cloned().collect())
        }

        async fn keyword_search(&self, _query: &str) -> Result<Vec<FaqEntry>, CapabilityError> {
            if self.fail {
                return Err(CapabilityError::Unavailable("index offline".to_string()));
            }
            Ok(self.keyword.clone())
        }
    }

    #[derive(Default)]
    pub struct FakeCatalog {
        pub books: Vec<BookRecord>,
        pub fail: bool,
    }

    #[async_trait]
    impl BookCatalogPort for FakeCatalog {
        async fn search_books(
            &self,
            criteria: &BookSearchCriteria,
        ) -> Result<Vec<BookRecord>, CapabilityError> {
            if self.fail {
                return Err(CapabilityError::Unavailable("catalog offline".to_string()));
            }
            Ok(self
                .books
                .iter()
                .filter(|b| match criteria.age_range() {
                    Some((from, to)) => b.fits_age(from, to),
                    None => true,
                })
                .cloned()
                .collect())
        }

        async fn find_book(&self, lookup: &BookLookup) -> Result<Option<BookRecord>, CapabilityError> {
            if self.fail {
                return Err(CapabilityError::Unavailable("catalog offline".to_string()));
            }
            Ok(self
                .books
                .iter()
                .find(|b| {
                    lookup.isbn.is_some() && b.isbn == lookup.isbn
                        || lookup
                            .title
                            .as_deref()
                            .is_some_and(|t| b.title.eq_ignore_ascii_case(t))
                })
                .cloned())
        }
    }

    pub fn book(id: u32, title: &str, from: u8, to: u8) -> BookRecord {
        BookRecord {
            id,
            title: title.to_string(),
            author: "A. Writer".to_string(),
            description: Some(format!("About {title}")),
            from_age: Some(from),
            to_age: Some(to),
            genre: Some("Adventure".to_string()),
            price: 12.5,
            quantity: 3,
            isbn: Some(format!("978000000000{id}")),
            ..Default::default()
        }
    }
}
