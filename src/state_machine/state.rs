//! Conversation state types

use crate::normalize::AnalyticalResult;
use chrono::{DateTime, Utc};

// ============================================================================
// Conversation State
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConvState {
    /// Ready for user input, no request in flight
    #[default]
    Idle,

    /// Agent request in flight
    Sending { prompt: String },
}

impl ConvState {
    pub fn is_working(&self) -> bool {
        matches!(self, ConvState::Sending { .. })
    }
}

// ============================================================================
// Messages
// ============================================================================

/// What an agent turn resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentPayload {
    /// Normalized analytical answer
    Parsed(AnalyticalResult),
    /// Text that could not be normalized but is still worth showing
    Raw(String),
    /// Transport or application failure, retryable
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationMessage {
    User {
        id: String,
        text: String,
        timestamp: DateTime<Utc>,
    },
    Agent {
        id: String,
        timestamp: DateTime<Utc>,
        payload: AgentPayload,
    },
}

impl ConversationMessage {
    pub fn user(text: impl Into<String>) -> Self {
        ConversationMessage::User {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn agent(payload: AgentPayload) -> Self {
        ConversationMessage::Agent {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            payload,
        }
    }

    #[cfg(test)]
    pub fn id(&self) -> &str {
        match self {
            ConversationMessage::User { id, .. } | ConversationMessage::Agent { id, .. } => id,
        }
    }

    #[cfg(test)]
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ConversationMessage::Agent {
                payload: AgentPayload::Failure(_),
                ..
            }
        )
    }
}

// ============================================================================
// Session
// ============================================================================

/// One conversation with the analyst.
///
/// Only the runtime mutates a session; a reset replaces it with a fresh one
/// rather than clearing it in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: String,
    messages: Vec<ConversationMessage>,
    state: ConvState,
    last_error: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            messages: Vec::new(),
            state: ConvState::Idle,
            last_error: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn state(&self) -> &ConvState {
        &self.state
    }

    pub fn in_flight(&self) -> bool {
        self.state.is_working()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Text of the most recent user message, resubmitted by retry
    pub fn last_user_text(&self) -> Option<&str> {
        self.messages.iter().rev().find_map(|m| match m {
            ConversationMessage::User { text, .. } => Some(text.as_str()),
            ConversationMessage::Agent { .. } => None,
        })
    }

    pub(crate) fn append(&mut self, message: ConversationMessage) {
        self.messages.push(message);
    }

    pub(crate) fn set_state(&mut self, state: ConvState) {
        self.state = state;
    }

    pub(crate) fn set_last_error(&mut self, error: Option<String>) {
        self.last_error = error;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed identity for a conversation runtime (bound at configuration time)
#[derive(Debug, Clone)]
pub struct ConvContext {
    pub agent_id: String,
    pub agent_name: String,
    pub user_id: String,
}

impl ConvContext {
    pub fn new(
        agent_id: impl Into<String>,
        agent_name: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            agent_name: agent_name.into(),
            user_id: user_id.into(),
        }
    }
}
