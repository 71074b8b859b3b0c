//! Analyst agent transport
//!
//! The agent is an opaque oracle behind an HTTP endpoint. The conversation
//! runtime only sees the [`AgentClient`] trait so tests can swap in mocks.

mod error;
mod http;
mod types;

pub use error::AgentError;
pub use http::HttpAgentClient;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for agent transports
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Send a prompt to the agent and wait for its answer
    async fn invoke(
        &self,
        prompt: &str,
        agent_id: &str,
        context: &AgentContext,
    ) -> Result<AgentCallResult, AgentError>;
}

#[async_trait]
impl<T: AgentClient + ?Sized> AgentClient for Arc<T> {
    async fn invoke(
        &self,
        prompt: &str,
        agent_id: &str,
        context: &AgentContext,
    ) -> Result<AgentCallResult, AgentError> {
        (**self).invoke(prompt, agent_id, context).await
    }
}

/// Logging wrapper for agent clients
pub struct LoggingClient {
    inner: Arc<dyn AgentClient>,
}

impl LoggingClient {
    pub fn new(inner: Arc<dyn AgentClient>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl AgentClient for LoggingClient {
    async fn invoke(
        &self,
        prompt: &str,
        agent_id: &str,
        context: &AgentContext,
    ) -> Result<AgentCallResult, AgentError> {
        let start = std::time::Instant::now();
        let result = self.inner.invoke(prompt, agent_id, context).await;
        let duration = start.elapsed();

        match &result {
            Ok(outcome) => {
                tracing::info!(
                    agent_id,
                    session_id = %context.session_id,
                    duration_ms = %duration.as_millis(),
                    success = outcome.success,
                    "Agent call completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    agent_id,
                    session_id = %context.session_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    retryable = e.kind.is_retryable(),
                    "Agent call failed"
                );
            }
        }

        result
    }
}
