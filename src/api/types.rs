//! API request and response types
//!
//! Agent answers are stored as plain text; the block form a display layer
//! needs is rendered here, on the way out.

use crate::markdown::{render, Block};
use crate::normalize::{AnalyticalResult, SwotBlock};
use crate::runtime::{OverviewStats, SessionSnapshot};
use crate::state_machine::{AgentPayload, ConversationMessage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to submit a prompt
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub text: String,
}

/// Request to retry; without text the last user message is resent
#[derive(Debug, Default, Deserialize)]
pub struct RetryRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// Response for queued actions
#[derive(Debug, Default, Deserialize)]
pub struct SessionQuery {
    /// Fill an empty log with the canned sample exchange
    #[serde(default)]
    pub sample: bool,
}

#[derive(Debug, Serialize)]
pub struct QueuedResponse {
    pub queued: bool,
}

/// Response for lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

// ============================================================================
// Session view
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub agent_name: String,
    pub in_flight: bool,
    pub last_error: Option<String>,
    pub overview: OverviewStats,
    /// Messages are the canned sample, not the live log
    pub sample: bool,
    pub messages: Vec<MessageView>,
}

impl SessionView {
    /// Show the sample exchange in place of an empty log
    pub fn with_sample(mut self, messages: &[ConversationMessage]) -> Self {
        if self.messages.is_empty() {
            self.messages = messages.iter().map(MessageView::from).collect();
            self.sample = true;
        }
        self
    }
}

impl From<&SessionSnapshot> for SessionView {
    fn from(snapshot: &SessionSnapshot) -> Self {
        let session = &snapshot.session;
        Self {
            session_id: session.id().to_string(),
            agent_name: snapshot.agent_name.clone(),
            in_flight: session.in_flight(),
            last_error: session.last_error().map(str::to_string),
            overview: snapshot.overview.clone(),
            sample: false,
            messages: session.messages().iter().map(MessageView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum MessageView {
    User {
        id: String,
        text: String,
        timestamp: DateTime<Utc>,
    },
    Agent {
        id: String,
        timestamp: DateTime<Utc>,
        payload: PayloadView,
    },
}

impl From<&ConversationMessage> for MessageView {
    fn from(message: &ConversationMessage) -> Self {
        match message {
            ConversationMessage::User {
                id,
                text,
                timestamp,
            } => MessageView::User {
                id: id.clone(),
                text: text.clone(),
                timestamp: *timestamp,
            },
            ConversationMessage::Agent {
                id,
                timestamp,
                payload,
            } => MessageView::Agent {
                id: id.clone(),
                timestamp: *timestamp,
                payload: PayloadView::from(payload),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PayloadView {
    Parsed {
        result: AnalyticalResult,
        rendered: RenderedResult,
    },
    Raw {
        text: String,
        blocks: Vec<Block>,
    },
    Failure {
        message: String,
    },
}

impl From<&AgentPayload> for PayloadView {
    fn from(payload: &AgentPayload) -> Self {
        match payload {
            AgentPayload::Parsed(result) => PayloadView::Parsed {
                rendered: RenderedResult::from(result),
                result: result.clone(),
            },
            AgentPayload::Raw(text) => PayloadView::Raw {
                blocks: render(text),
                text: text.clone(),
            },
            AgentPayload::Failure(message) => PayloadView::Failure {
                message: message.clone(),
            },
        }
    }
}

/// Every free-text field of an analytical result, rendered to blocks
#[derive(Debug, Serialize)]
pub struct RenderedResult {
    pub qualification_probability: Vec<Block>,
    pub nrr_impact: Vec<Block>,
    /// False when all four SWOT fields are empty and the section should be hidden
    pub has_swot: bool,
    pub swot: RenderedSwot,
    pub strategy_recommendations: Vec<Vec<Block>>,
    pub scenario_outlook: Vec<Block>,
    pub summary: Vec<Block>,
}

#[derive(Debug, Serialize)]
pub struct RenderedSwot {
    pub strengths: Vec<Block>,
    pub weaknesses: Vec<Block>,
    pub opportunities: Vec<Block>,
    pub threats: Vec<Block>,
}

impl From<&AnalyticalResult> for RenderedResult {
    fn from(result: &AnalyticalResult) -> Self {
        Self {
            qualification_probability: render(&result.qualification_probability),
            nrr_impact: render(&result.nrr_impact),
            has_swot: !result.swot.is_empty(),
            swot: RenderedSwot::from(&result.swot),
            strategy_recommendations: result
                .strategy_recommendations
                .iter()
                .map(String::as_str)
                .map(render)
                .collect(),
            scenario_outlook: render(&result.scenario_outlook),
            summary: render(&result.summary),
        }
    }
}

impl From<&SwotBlock> for RenderedSwot {
    fn from(swot: &SwotBlock) -> Self {
        Self {
            strengths: render(&swot.strengths),
            weaknesses: render(&swot.weaknesses),
            opportunities: render(&swot.opportunities),
            threats: render(&swot.threats),
        }
    }
}
