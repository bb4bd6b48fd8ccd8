//! HTTP adapter for the coaching backend's agent-chat endpoint.
//!
//! One POST per call: `{ "user_id", "message" }` in, `{ "reply", "*_score"? }` out.
//! Failures surface as `DomainError::Llm`; retrying is left to the user.

use crate::domain::{DomainError, LlmReply};
use crate::ports::LlmPort;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Agent-chat HTTP adapter.
pub struct AgentChatAdapter {
    client: reqwest::Client,
    endpoint: String,
}

impl AgentChatAdapter {
    /// Create a new adapter.
    ///
    /// # Arguments
    /// * `api_url` - Backend base URL (e.g., "http://localhost:8000")
    /// * `timeout` - Per-request timeout
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Llm(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: Self::endpoint(api_url),
        })
    }

    fn endpoint(api_url: &str) -> String {
        format!("{}/agent-chat", api_url.trim_end_matches('/'))
    }

    /// Parse the response body. Missing `reply` becomes an empty string.
    fn parse_reply(body: &str) -> Result<LlmReply, DomainError> {
        serde_json::from_str(body).map_err(|e| {
            warn!(error = %e, body = %body.chars().take(200).collect::<String>(), "JSON parse failed");
            DomainError::Llm(format!("Failed to parse agent response: {}", e))
        })
    }
}

#[derive(Serialize)]
struct AgentChatRequest<'a> {
    user_id: &'a str,
    message: &'a str,
}

#[async_trait::async_trait]
impl LlmPort for AgentChatAdapter {
    async fn ask(&self, user_id: &str, message: &str) -> Result<LlmReply, DomainError> {
        info!(
            user_id,
            prompt_len = message.len(),
            "sending prompt to agent"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&AgentChatRequest { user_id, message })
            .send()
            .await
            .map_err(|e| DomainError::Llm(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "agent API returned error");
            return Err(DomainError::Llm(format!(
                "API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DomainError::Llm(format!("Failed to read agent response: {}", e)))?;
        let reply = Self::parse_reply(&body)?;

        debug!(
            reply_len = reply.reply.len(),
            direct_scores = ?reply.scores,
            "received agent reply"
        );

        Ok(reply)
    }
}
