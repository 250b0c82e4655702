//! Per-session workflow state cache
//!
//! Holds the latest [`AgentState`] of every session so it can be inspected
//! after a turn. Entries are dropped by a periodic sweep once they exceed the
//! configured age.

use chrono::{DateTime, Utc};
use seeker_domain::{AgentState, Interface, StateError, ToolKind};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

struct StoredState {
    state: AgentState,
    stored_at: DateTime<Utc>,
}

/// Snapshot of a stored state for diagnostics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSummary {
    pub session_id: String,
    pub interface: Interface,
    pub current_agent: String,
    pub message_count: usize,
    pub results_present: Vec<ToolKind>,
    pub routing_decision: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct StateManager {
    states: Mutex<HashMap<String, StoredState>>,
}

impl StateManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, StoredState>> {
        // A poisoned map only means another thread panicked mid-insert; the data is still usable
        self.states.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Create and cache the initial state for a request.
    pub fn create_initial_state(
        &self,
        session_id: &str,
        interface: &str,
        message: &str,
    ) -> Result<AgentState, StateError> {
        let state = AgentState::initial(session_id, interface, message)?;
        self.store(state.clone());
        Ok(state)
    }

    /// Replace the cached state of the state's session
    pub fn store(&self, state: AgentState) {
        let key = state.session_id.clone();
        self.lock().insert(
            key,
            StoredState {
                state,
                stored_at: Utc::now(),
            },
        );
    }

    pub fn get(&self, session_id: &str) -> Option<AgentState> {
        self.lock().get(session_id).map(|s| s.state.clone())
    }

    pub fn remove(&self, session_id: &str) -> bool {
        self.lock().remove(session_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn state_summary(&self, session_id: &str) -> Option<StateSummary> {
        let states = self.lock();
        let state = &states.get(session_id)?.state;
        Some(StateSummary {
            session_id: state.session_id.clone(),
            interface: state.interface,
            current_agent: state.current_agent.clone(),
            message_count: state.messages.len(),
            results_present: ToolKind::all()
                .into_iter()
                .filter(|tool| state.agent_results.has(*tool))
                .collect(),
            routing_decision: state
                .shared_data
                .routing_analysis
                .as_ref()
                .map(|a| a.next_node.clone()),
            created_at: state.created_at,
        })
    }

    /// Drop states stored longer than `max_age` ago; returns how many were removed
    pub fn cleanup_old_states(&self, max_age: Duration) -> usize {
        let max_age = chrono::Duration::from_std(max_age).unwrap_or(chrono::Duration::MAX);
        let cutoff = Utc::now() - max_age;
        let mut states = self.lock();
        let before = states.len();
        states.retain(|_, stored| stored.stored_at > cutoff);
        before - states.len()
    }

    /// Run [`Self::cleanup_old_states`] every `interval` until `cancel` fires.
    pub fn spawn_sweeper(
        manager: Arc<Self>,
        interval: Duration,
        max_age: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("State sweeper stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        let removed = manager.cleanup_old_states(max_age);
                        if removed > 0 {
                            info!(removed, "Swept expired workflow states");
                        }
                    }
                }
            }
        })
    }
}
