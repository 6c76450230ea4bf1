//! OpenAI-compatible chat completion client.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::config::LlmConfig;
use super::{ChatMessage, LlmError};

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for a single completion provider.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    http: Client,
    config: LlmConfig,
}

impl CompletionClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Request a completion for `messages` and return the first choice's text.
    #[instrument(
        name = "llm.complete",
        skip(self, messages),
        fields(model = %self.config.model, turns = messages.len())
    )]
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(LlmError::MissingApiKey)?;

        let resp = self
            .http
            .post(self.config.endpoint())
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&CompletionRequest {
                model: &self.config.model,
                messages,
                temperature: self.config.temperature,
                max_tokens: self.config.max_tokens,
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw = resp.text().await?;
        let data: CompletionResponse = serde_json::from_str(&raw)?;

        let content = data
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(LlmError::EmptyReply)?;

        debug!(chars = content.len(), "completion received");
        Ok(content)
    }
}
