//! In-memory conversation store with idle expiry and summary folding

use crate::config::FileSessionConfig;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use seeker_application::{ConversationTurn, SessionError, SessionRecord, SessionStore};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

const KEY_PREFIX: &str = "session:";
const SUMMARY_SEPARATOR: &str = " | ";

/// [`SessionStore`] holding records in a process-local map.
///
/// Records are keyed `session:{id}`. A record idle for longer than the TTL
/// is treated as absent and removed on the next access or sweep. Only the
/// last `max_turns` turns are kept verbatim; older turns are folded into
/// `compressed_summary`, which keeps at most `summary_max_chars` characters
/// (the most recent ones).
pub struct InMemorySessionStore {
    records: Mutex<HashMap<String, SessionRecord>>,
    ttl: Duration,
    max_turns: usize,
    summary_max_chars: usize,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration, max_turns: usize, summary_max_chars: usize) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            ttl,
            max_turns: max_turns.max(1),
            summary_max_chars,
        }
    }

    pub fn from_config(config: &FileSessionConfig) -> Self {
        Self::new(
            Duration::from_secs(config.ttl_seconds),
            config.max_turns,
            config.summary_max_chars,
        )
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn key(session_id: &str) -> String {
        format!("{KEY_PREFIX}{session_id}")
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionRecord>> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_expired(&self, record: &SessionRecord) -> bool {
        let ttl = ChronoDuration::from_std(self.ttl).unwrap_or(ChronoDuration::MAX);
        Utc::now() - record.last_activity > ttl
    }

    fn fold_overflow(&self, record: &mut SessionRecord) {
        while record.recent_turns.len() > self.max_turns {
            let oldest = record.recent_turns.remove(0);
            let line = format!("User: {} / Assistant: {}", oldest.user, oldest.assistant);
            let summary = match record.compressed_summary.take() {
                Some(existing) => format!("{existing}{SUMMARY_SEPARATOR}{line}"),
                None => line,
            };
            record.compressed_summary = Some(keep_tail(&summary, self.summary_max_chars));
        }
    }
}

/// Last `max_chars` characters of `text`
fn keep_tail(text: &str, max_chars: usize) -> String {
    let count = text.chars().count();
    if count <= max_chars {
        return text.to_string();
    }
    text.chars().skip(count - max_chars).collect()
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create_session(&self, session_id: Option<&str>) -> Result<SessionRecord, SessionError> {
        let session_id = session_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let record = SessionRecord::new(&session_id);
        self.lock().insert(Self::key(&session_id), record.clone());
        debug!(session_id = %session_id, "Session created");
        Ok(record)
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<SessionRecord>, SessionError> {
        let key = Self::key(session_id);
        let mut records = self.lock();
        match records.get(&key) {
            Some(record) if self.is_expired(record) => {
                records.remove(&key);
                debug!(session_id = %session_id, "Session expired");
                Ok(None)
            }
            Some(record) => Ok(Some(record.clone())),
            None => Ok(None),
        }
    }

    async fn append_turn(
        &self,
        session_id: &str,
        turn: ConversationTurn,
    ) -> Result<SessionRecord, SessionError> {
        let key = Self::key(session_id);
        let mut records = self.lock();

        let expired = records.get(&key).is_some_and(|r| self.is_expired(r));
        if expired {
            records.remove(&key);
        }
        let record = records
            .entry(key)
            .or_insert_with(|| SessionRecord::new(session_id));

        record.last_activity = Utc::now();
        record.recent_turns.push(turn);
        self.fold_overflow(record);
        Ok(record.clone())
    }

    async fn delete_session(&self, session_id: &str) -> Result<bool, SessionError> {
        Ok(self.lock().remove(&Self::key(session_id)).is_some())
    }

    async fn sweep_expired(&self) -> Result<usize, SessionError> {
        let mut records = self.lock();
        let before = records.len();
        records.retain(|_, record| !self.is_expired(record));
        let removed = before - records.len();
        if removed > 0 {
            info!(removed, "Expired sessions swept");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> InMemorySessionStore {
        InMemorySessionStore::new(Duration::from_secs(60), 2, 40)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = store();
        let record = store.create_session(Some("abc")).await.unwrap();
        assert_eq!(record.session_id, "abc");
        assert!(store.get_session("abc").await.unwrap().is_some());
        assert!(store.get_session("other").await.unwrap().is_none());
        assert!(store.lock().contains_key("session:abc"));
    }

    #[tokio::test]
    async fn test_create_without_id_generates_one() {
        let store = store();
        let record = store.create_session(None).await.unwrap();
        assert!(!record.session_id.is_empty());
        let blank = store.create_session(Some("  ")).await.unwrap();
        assert_ne!(blank.session_id.trim(), "");
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_overflow_folds_into_summary() {
        let store = store();
        for i in 1..=3 {
            store
                .append_turn("s", ConversationTurn::new(format!("q{i}"), format!("a{i}")))
                .await
                .unwrap();
        }
        let record = store.get_session("s").await.unwrap().unwrap();
        assert_eq!(record.recent_turns.len(), 2);
        assert_eq!(record.recent_turns[0].user, "q2");
        assert_eq!(
            record.compressed_summary.as_deref(),
            Some("User: q1 / Assistant: a1")
        );
    }

    #[tokio::test]
    async fn test_summary_keeps_most_recent_chars() {
        let store = InMemorySessionStore::new(Duration::from_secs(60), 1, 10);
        store
            .append_turn("s", ConversationTurn::new("first question", "first answer"))
            .await
            .unwrap();
        let record = store
            .append_turn("s", ConversationTurn::new("second", "reply"))
            .await
            .unwrap();
        let summary = record.compressed_summary.unwrap();
        assert_eq!(summary.chars().count(), 10);
        assert!(summary.ends_with("st answer"));
    }

    #[tokio::test]
    async fn test_ttl_expiry() {
        let store = InMemorySessionStore::new(Duration::ZERO, 5, 100);
        store.create_session(Some("s")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(store.get_session("s").await.unwrap().is_none());
        assert!(store.is_empty());

        store.create_session(Some("t")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(store.sweep_expired().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_and_context() {
        let store = store();
        store
            .append_turn("s", ConversationTurn::new("Any dragon books?", "Try Dragon Rider."))
            .await
            .unwrap();
        let context = store.conversation_context("s").await.unwrap().unwrap();
        assert!(context.contains("User: Any dragon books?"));

        assert!(store.delete_session("s").await.unwrap());
        assert!(!store.delete_session("s").await.unwrap());
    }

    #[test]
    fn test_keep_tail_is_char_safe() {
        assert_eq!(keep_tail("héllo", 3), "llo");
        assert_eq!(keep_tail("ok", 5), "ok");
    }
}
