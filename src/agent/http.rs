//! HTTP implementation of the agent call collaborator

use super::types::AgentRequest;
use super::{AgentCallResult, AgentClient, AgentContext, AgentError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub struct HttpAgentClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpAgentClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AgentError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AgentError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }

    fn classify_error(status: StatusCode, body: &str) -> AgentError {
        let message = body.to_string();
        match status.as_u16() {
            401 | 403 => AgentError::auth(format!("Authentication failed: {message}")),
            429 => AgentError::rate_limit(format!("Rate limited: {message}")),
            400 => AgentError::invalid_request(format!("Invalid request: {message}")),
            500..=599 => AgentError::server_error(format!("Server error: {message}")),
            _ => AgentError::unknown(format!("HTTP {status}: {message}")),
        }
    }
}

#[async_trait]
impl AgentClient for HttpAgentClient {
    async fn invoke(
        &self,
        prompt: &str,
        agent_id: &str,
        context: &AgentContext,
    ) -> Result<AgentCallResult, AgentError> {
        let body = AgentRequest {
            message: prompt,
            agent_id,
            user_id: &context.user_id,
            session_id: &context.session_id,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                AgentError::network(format!("Request timeout: {e}"))
            } else if e.is_connect() {
                AgentError::network(format!("Connection failed: {e}"))
            } else {
                AgentError::unknown(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AgentError::network(format!("Failed to read response: {e}")))?;

        match serde_json::from_str::<AgentCallResult>(&text) {
            Ok(result) if status.is_success() || !result.success => Ok(result),
            Ok(_) => Err(Self::classify_error(status, &text)),
            Err(e) if status.is_success() => Err(AgentError::unknown(format!(
                "Failed to parse response: {e} - body: {text}"
            ))),
            Err(_) => Err(Self::classify_error(status, &text)),
        }
    }
}
