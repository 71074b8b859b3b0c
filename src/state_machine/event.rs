//! Events that can occur in a conversation

use crate::agent::AgentCallResult;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    Submit {
        text: String,
    },
    Retry {
        text: String,
    },
    Reset,

    // Agent events
    AgentResolved {
        /// Session the request was issued for
        session_id: String,
        outcome: CallOutcome,
    },
}

/// How an agent call finished
#[derive(Debug, Clone)]
pub enum CallOutcome {
    /// The transport delivered a response (which may still report failure)
    Completed(AgentCallResult),
    /// The transport itself failed
    Failed(String),
}
