//! Session store port
//!
//! Conversation history keyed by session id. Orchestration only reads,
//! appends to and deletes sessions; compression and expiry are the
//! adapter's business.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Session storage error: {0}")]
    Storage(String),
}

/// One user/assistant exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub user: String,
    pub assistant: String,
    pub at: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
            at: Utc::now(),
        }
    }
}

/// Stored conversation for one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub recent_turns: Vec<ConversationTurn>,
    pub compressed_summary: Option<String>,
}

impl SessionRecord {
    pub fn new(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            created_at: now,
            last_activity: now,
            recent_turns: Vec::new(),
            compressed_summary: None,
        }
    }

    /// Summary followed by the recent turns, oldest first
    pub fn conversation_context(&self) -> String {
        let mut lines = Vec::new();
        if let Some(summary) = &self.compressed_summary {
            lines.push(format!("Earlier conversation: {summary}"));
        }
        for turn in &self.recent_turns {
            lines.push(format!("User: {}", turn.user));
            lines.push(format!("Assistant: {}", turn.assistant));
        }
        lines.join("\n")
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a session, generating an id when none is given
    async fn create_session(&self, session_id: Option<&str>) -> Result<SessionRecord, SessionError>;

    /// Live (non-expired) session, if any
    async fn get_session(&self, session_id: &str) -> Result<Option<SessionRecord>, SessionError>;

    async fn append_turn(
        &self,
        session_id: &str,
        turn: ConversationTurn,
    ) -> Result<SessionRecord, SessionError>;

    /// Returns whether a session was removed
    async fn delete_session(&self, session_id: &str) -> Result<bool, SessionError>;

    /// Remove expired sessions, returning how many were dropped
    async fn sweep_expired(&self) -> Result<usize, SessionError>;

    async fn conversation_context(&self, session_id: &str) -> Result<Option<String>, SessionError> {
        Ok(self
            .get_session(session_id)
            .await?
            .map(|record| record.conversation_context()))
    }
}
