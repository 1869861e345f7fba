//! Chat completion exchange against the gateway.

use std::time::Duration;

use reqwest::Client;

use meshlink_common::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

use crate::config::GatewayConfig;
use crate::error::{Error, Result};

/// Issues one authenticated, non-streaming chat completion request.
pub struct CompletionClient {
    http_client: Client,
    config: GatewayConfig,
    timeout: Duration,
}

/// The reply extracted from a completion response: the first choice's text
/// plus the metadata the gateway echoes back.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub content: String,
    pub model: String,
    pub id: String,
}

impl CompletionClient {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            http_client: Client::new(),
            config: config.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    /// Send `messages` to `model` authenticated with `api_key` and read
    /// exactly one response.
    ///
    /// An empty message sequence is rejected before any network I/O. Replies
    /// are not deterministic; calling twice with identical input may yield
    /// different content.
    pub async fn complete(
        &self,
        api_key: &str,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<ChatReply> {
        if messages.is_empty() {
            return Err(Error::InvalidRequest(
                "message sequence must not be empty".to_string(),
            ));
        }

        let url = self.config.completions_url();
        tracing::debug!("Requesting completion for model '{}' at {}", model, url);

        let response = self
            .http_client
            .post(&url)
            .timeout(self.timeout)
            .bearer_auth(api_key)
            .json(&ChatCompletionRequest {
                model: model.to_string(),
                messages: messages.to_vec(),
                temperature: None,
                stream: None,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::from_response(response).await);
        }

        let decoded: ChatCompletionResponse = response.json().await?;
        let content = decoded
            .first_content()
            .ok_or_else(|| Error::Protocol("completion response contained no choices".to_string()))?
            .to_string();

        tracing::info!("Completion {} answered by model {}", decoded.id, decoded.model);

        Ok(ChatReply {
            content,
            model: decoded.model,
            id: decoded.id,
        })
    }
}
