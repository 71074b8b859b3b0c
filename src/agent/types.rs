//! Wire types for the agent call collaborator

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identity attached to every agent call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentContext {
    pub user_id: String,
    pub session_id: String,
}

/// Outcome reported by the agent endpoint.
///
/// `success == false` is an application failure carried in an otherwise
/// successful transport exchange.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentCallResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub response: Option<AgentResponse>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
impl AgentCallResult {
    pub fn ok(result: Value) -> Self {
        Self {
            success: true,
            response: Some(AgentResponse {
                result,
                message: None,
            }),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(error.into()),
        }
    }
}

impl AgentCallResult {
    /// The raw payload to normalize (`response.result`)
    pub fn result(&self) -> &Value {
        self.response.as_ref().map_or(&Value::Null, |r| &r.result)
    }

    /// `response.message`, if present and non-empty
    pub fn message(&self) -> Option<&str> {
        self.response
            .as_ref()
            .and_then(|r| r.message.as_deref())
            .filter(|m| !m.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub message: Option<String>,
}

/// Request body sent to the agent endpoint
#[derive(Debug, Serialize)]
pub(crate) struct AgentRequest<'a> {
    pub message: &'a str,
    pub agent_id: &'a str,
    pub user_id: &'a str,
    pub session_id: &'a str,
}
