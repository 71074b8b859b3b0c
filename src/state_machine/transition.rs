//! Pure state transition function
//!
//! Given the same session and event, `transition` always produces the same
//! new state and effects. Message ids, timestamps and the agent call itself
//! belong to the runtime that executes the effects.

use super::{AgentPayload, CallOutcome, ConvState, Effect, Event, Session};
use crate::agent::AgentCallResult;
use crate::normalize::{extract_percentage, normalize};
use serde_json::Value;
use thiserror::Error;

const DEFAULT_FAILURE: &str = "Failed to get analysis. Please try again.";
const UNEXPECTED_ERROR: &str = "An unexpected error occurred";
const EMPTY_RESPONSE: &str = "The agent returned an empty response";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Events the machine declines. The runtime treats all of them as no-ops.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Message is empty")]
    EmptyInput,
    #[error("Agent is busy, wait for the current analysis to finish")]
    AgentBusy,
    #[error("Response for session {got} ignored, active session is {active}")]
    StaleSession { active: String, got: String },
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

pub fn transition(session: &Session, event: Event) -> Result<TransitionResult, TransitionError> {
    match (session.state(), event) {
        // ============================================================
        // User Input
        // ============================================================
        (state, Event::Submit { text }) => submit(session.id(), state, &text),

        // Retry clears the error even when there is nothing to resend
        (state, Event::Retry { text }) => match submit(session.id(), state, &text) {
            Ok(result) => Ok(result),
            Err(TransitionError::EmptyInput) => Ok(TransitionResult::new(state.clone())
                .with_effect(Effect::SetLastError(None))),
            Err(e) => Err(e),
        },

        // Any in-flight request is left to resolve against a dead session id
        (_, Event::Reset) => Ok(TransitionResult::new(ConvState::Idle)
            .with_effect(Effect::ReplaceSession)
            .with_effect(Effect::ResetActivity)),

        // ============================================================
        // Agent Resolution
        // ============================================================
        (_, Event::AgentResolved { session_id, .. }) if session_id != session.id() => {
            Err(TransitionError::StaleSession {
                active: session.id().to_string(),
                got: session_id,
            })
        }

        (ConvState::Sending { .. }, Event::AgentResolved { outcome, .. }) => {
            let effects = match outcome {
                CallOutcome::Completed(result) if result.success => resolve_success(&result),
                CallOutcome::Completed(result) => Effect::failure(failure_message(&result)).to_vec(),
                CallOutcome::Failed(message) if message.trim().is_empty() => {
                    Effect::failure(UNEXPECTED_ERROR).to_vec()
                }
                CallOutcome::Failed(message) => Effect::failure(message).to_vec(),
            };

            Ok(TransitionResult::new(ConvState::Idle)
                .with_effects(effects)
                .with_effect(Effect::SetProcessing(false)))
        }

        (ConvState::Idle, Event::AgentResolved { .. }) => Err(TransitionError::InvalidTransition(
            "Agent response received with no request in flight".to_string(),
        )),
    }
}

fn submit(session_id: &str, state: &ConvState, text: &str) -> Result<TransitionResult, TransitionError> {
    let prompt = text.trim();
    if prompt.is_empty() {
        return Err(TransitionError::EmptyInput);
    }
    if state.is_working() {
        return Err(TransitionError::AgentBusy);
    }

    Ok(TransitionResult::new(ConvState::Sending {
        prompt: prompt.to_string(),
    })
    .with_effect(Effect::AppendUserMessage {
        text: prompt.to_string(),
    })
    .with_effect(Effect::SetLastError(None))
    .with_effect(Effect::SetProcessing(true))
    .with_effect(Effect::InvokeAgent {
        session_id: session_id.to_string(),
        prompt: prompt.to_string(),
    }))
}

fn resolve_success(result: &AgentCallResult) -> Vec<Effect> {
    let raw = result.result();

    if let Some(parsed) = normalize(raw) {
        let percentage = extract_percentage(&parsed.qualification_probability);
        let mut effects = vec![Effect::agent_message(AgentPayload::Parsed(parsed))];
        if let Some(percentage) = percentage {
            effects.push(Effect::UpdateQualification { percentage });
        }
        return effects;
    }

    match best_available_text(raw, result.message()) {
        Some(text) => vec![Effect::agent_message(AgentPayload::Raw(text))],
        None => Effect::failure(EMPTY_RESPONSE).to_vec(),
    }
}

/// Fallback text when the payload is not object-shaped
fn best_available_text(raw: &Value, message: Option<&str>) -> Option<String> {
    match raw {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        _ => message.map(str::to_string).or_else(|| match raw {
            Value::Null | Value::String(_) => None,
            other => Some(other.to_string()),
        }),
    }
}

fn failure_message(result: &AgentCallResult) -> String {
    result
        .error
        .as_deref()
        .filter(|e| !e.is_empty())
        .or_else(|| result.message())
        .unwrap_or(DEFAULT_FAILURE)
        .to_string()
}
