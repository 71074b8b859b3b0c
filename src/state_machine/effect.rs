//! Effects produced by state transitions

use super::state::AgentPayload;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Append a user message to the log
    AppendUserMessage { text: String },

    /// Append an agent message to the log
    AppendAgentMessage { payload: AgentPayload },

    SetLastError(Option<String>),

    /// Issue the agent call, tagged with the session it belongs to
    InvokeAgent { session_id: String, prompt: String },

    /// Toggle the activity collaborator's processing flag
    SetProcessing(bool),

    /// Refresh the headline qualification figure
    UpdateQualification { percentage: String },

    /// Discard the session and start a fresh one
    ReplaceSession,

    ResetActivity,
}

impl Effect {
    pub fn agent_message(payload: AgentPayload) -> Self {
        Effect::AppendAgentMessage { payload }
    }

    /// Failure message plus the matching `last_error`
    pub fn failure(message: impl Into<String>) -> [Self; 2] {
        let message = message.into();
        [
            Effect::AppendAgentMessage {
                payload: AgentPayload::Failure(message.clone()),
            },
            Effect::SetLastError(Some(message)),
        ]
    }
}
