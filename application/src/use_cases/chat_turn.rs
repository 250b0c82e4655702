//! Chat turn use case
//!
//! Entry point for one conversational request: resolves the session, runs
//! the workflow and records the exchange. A turn never fails; every failure
//! becomes the apology text with a `failed` status.

use super::state_manager::StateManager;
use crate::ports::observer::{NoObserver, RunStatus, TurnSummary, WorkflowObserver};
use crate::ports::session_store::{ConversationTurn, SessionRecord, SessionError, SessionStore};
use crate::workflow::executor::{WorkflowExecutor, WorkflowRun};
use seeker_domain::{Command, FALLBACK_APOLOGY, FaultKind, NodeId, SharedData};
use seeker_domain::core::string::non_blank;
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Input for a chat turn
#[derive(Debug, Clone)]
pub struct ChatTurnInput {
    pub message: String,
    pub session_id: Option<String>,
    pub interface: String,
}

impl ChatTurnInput {
    pub fn new(message: impl Into<String>, interface: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            session_id: None,
            interface: interface.into(),
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatResponse {
    pub output: String,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatTurnOutput {
    pub session_id: String,
    pub correlation_id: String,
    pub response: ChatResponse,
    pub status: RunStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    Partial,
    Final,
}

/// One line of a streamed turn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnChunk {
    pub session_id: String,
    #[serde(rename = "type")]
    pub kind: ChunkKind,
    pub response: ChatResponse,
}

impl TurnChunk {
    pub fn is_final(&self) -> bool {
        self.kind == ChunkKind::Final
    }

    /// Newline-terminated JSON line
    pub fn to_ndjson(&self) -> String {
        let mut line = serde_json::to_string(self).unwrap_or_else(|_| {
            json!({"session_id": self.session_id, "type": "final", "response": {"output": FALLBACK_APOLOGY, "data": {}}})
                .to_string()
        });
        line.push('\n');
        line
    }
}

#[derive(Clone)]
pub struct ChatTurnUseCase {
    executor: Arc<WorkflowExecutor>,
    sessions: Arc<dyn SessionStore>,
    states: Arc<StateManager>,
}

impl ChatTurnUseCase {
    pub fn new(
        executor: Arc<WorkflowExecutor>,
        sessions: Arc<dyn SessionStore>,
        states: Arc<StateManager>,
    ) -> Self {
        Self {
            executor,
            sessions,
            states,
        }
    }

    pub fn states(&self) -> &Arc<StateManager> {
        &self.states
    }

    pub async fn execute(&self, input: ChatTurnInput) -> ChatTurnOutput {
        self.execute_with_observer(input, &NoObserver).await
    }

    pub async fn execute_with_observer(
        &self,
        input: ChatTurnInput,
        observer: &dyn WorkflowObserver,
    ) -> ChatTurnOutput {
        let session_id = self.resolve_session(input.session_id.as_deref()).await;
        let correlation_id = Uuid::new_v4().to_string();
        observer.on_turn_start(&session_id, &correlation_id);
        info!(session_id = %session_id, correlation_id = %correlation_id, "Chat turn started");

        let mut state = match self
            .states
            .create_initial_state(&session_id, &input.interface, &input.message)
        {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "Rejected chat turn input");
                let output = ChatTurnOutput {
                    session_id: session_id.clone(),
                    correlation_id: correlation_id.clone(),
                    response: error_response(&correlation_id, FaultKind::Validation.as_str()),
                    status: RunStatus::Failed,
                };
                observer.on_turn_complete(&TurnSummary {
                    session_id,
                    correlation_id,
                    status: RunStatus::Failed,
                    steps: 0,
                    visited: Vec::new(),
                    response: output.response.output.clone(),
                });
                return output;
            }
        };
        state.apply(Command::new().with_shared_data(SharedData {
            correlation_id: Some(correlation_id.clone()),
            ..Default::default()
        }));

        let run = self.executor.run(state, observer).await;
        self.states.store(run.state.clone());

        if let Err(e) = self
            .sessions
            .append_turn(&session_id, ConversationTurn::new(&input.message, &run.response))
            .await
        {
            warn!(session_id = %session_id, error = %e, "Failed to record conversation turn");
        }

        observer.on_turn_complete(&TurnSummary {
            session_id: session_id.clone(),
            correlation_id: correlation_id.clone(),
            status: run.status,
            steps: run.steps,
            visited: run.visited.clone(),
            response: run.response.clone(),
        });

        ChatTurnOutput {
            response: build_response(&run, &correlation_id),
            status: run.status,
            session_id,
            correlation_id,
        }
    }

    /// Run a turn in the background, streaming tool fragments as `partial`
    /// chunks followed by exactly one `final` chunk.
    pub fn execute_streaming(
        &self,
        input: ChatTurnInput,
        observer: Arc<dyn WorkflowObserver>,
    ) -> mpsc::UnboundedReceiver<TurnChunk> {
        let (tx, rx) = mpsc::unbounded_channel();
        let this = self.clone();

        tokio::spawn(async move {
            let streaming = StreamingObserver {
                tx: tx.clone(),
                inner: observer,
                session_id: std::sync::Mutex::new(String::new()),
            };
            let output = this.execute_with_observer(input, &streaming).await;
            let _ = tx.send(TurnChunk {
                session_id: output.session_id,
                kind: ChunkKind::Final,
                response: output.response,
            });
        });
        rx
    }

    /// Conversation history of a session
    pub async fn history(&self, session_id: &str) -> Result<Option<SessionRecord>, SessionError> {
        self.sessions.get_session(session_id).await
    }

    /// Forget a session and its cached workflow state
    pub async fn reset_session(&self, session_id: &str) -> Result<bool, SessionError> {
        self.states.remove(session_id);
        self.sessions.delete_session(session_id).await
    }

    /// Background sweep of expired sessions; logs and keeps going on errors
    pub async fn sweep_sessions(&self) -> usize {
        match self.sessions.sweep_expired().await {
            Ok(removed) => removed,
            Err(e) => {
                warn!(error = %e, "Session sweep failed");
                0
            }
        }
    }

    async fn resolve_session(&self, requested: Option<&str>) -> String {
        let session_id = requested
            .and_then(non_blank)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        match self.sessions.get_session(&session_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                if let Err(e) = self.sessions.create_session(Some(&session_id)).await {
                    warn!(session_id = %session_id, error = %e, "Failed to create session");
                }
            }
            Err(e) => warn!(session_id = %session_id, error = %e, "Session lookup failed"),
        }
        session_id
    }
}

fn build_response(run: &WorkflowRun, correlation_id: &str) -> ChatResponse {
    match &run.error_type {
        Some(error_type) => error_response(correlation_id, error_type),
        None => ChatResponse {
            output: run.response.clone(),
            data: json!({
                "status": "completed",
                "correlation_id": correlation_id,
                "results": serde_json::to_value(&run.state.agent_results).unwrap_or_default(),
            }),
        },
    }
}

fn error_response(correlation_id: &str, error_type: &str) -> ChatResponse {
    ChatResponse {
        output: FALLBACK_APOLOGY.to_string(),
        data: json!({
            "status": "error",
            "correlation_id": correlation_id,
            "error_type": error_type,
        }),
    }
}

/// Forwards events to an inner observer and emits tool fragments as chunks
struct StreamingObserver {
    tx: mpsc::UnboundedSender<TurnChunk>,
    inner: Arc<dyn WorkflowObserver>,
    session_id: std::sync::Mutex<String>,
}

impl StreamingObserver {
    fn session_id(&self) -> String {
        self.session_id
            .lock()
            .map(|id| id.clone())
            .unwrap_or_default()
    }
}

impl WorkflowObserver for StreamingObserver {
    fn on_turn_start(&self, session_id: &str, correlation_id: &str) {
        if let Ok(mut id) = self.session_id.lock() {
            *id = session_id.to_string();
        }
        self.inner.on_turn_start(session_id, correlation_id);
    }

    fn on_node_start(&self, node: NodeId) {
        self.inner.on_node_start(node);
    }

    fn on_node_complete(&self, node: NodeId, command: &Command, elapsed: Duration) {
        if node.is_tool() {
            let fragments = command
                .messages
                .iter()
                .filter_map(|m| m.metadata.get("fragment").and_then(Value::as_str));
            for fragment in fragments {
                let _ = self.tx.send(TurnChunk {
                    session_id: self.session_id(),
                    kind: ChunkKind::Partial,
                    response: ChatResponse {
                        output: fragment.to_string(),
                        data: json!({"node": node.as_str()}),
                    },
                });
            }
        }
        self.inner.on_node_complete(node, command, elapsed);
    }

    fn on_route(&self, from: NodeId, to: &[NodeId]) {
        self.inner.on_route(from, to);
    }

    fn on_turn_complete(&self, summary: &TurnSummary) {
        self.inner.on_turn_complete(summary);
    }
}
