use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CompletionConfig;

/// Instruction sent ahead of every situation.
pub const SYSTEM_PROMPT: &str = "You are a very strong poker player. All pot sizes and bet sizes are in big blinds. You will analyze this hand and give me a recommendation on what to do. Be concise.";

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("completion response was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("completion API returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("completion response had no message content")]
    EmptyResponse,
}

/// An opaque text-completion capability.
#[async_trait]
pub trait CompletionApi: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        user_text: &str,
    ) -> Result<String, CompletionError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    fn into_first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()?
            .message
            .content
            .filter(|content| !content.is_empty())
    }
}

/// Chat-completions client speaking the OpenAI wire format.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    config: CompletionConfig,
}

impl OpenAiClient {
    pub fn new(config: CompletionConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl CompletionApi for OpenAiClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_text: &str,
    ) -> Result<String, CompletionError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_text,
                },
            ],
        };

        let response = self
            .http
            .post(self.config.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status { status, body });
        }

        let body = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body)?;
        debug!(model = %self.config.model, choices = parsed.choices.len(), "completion received");
        parsed
            .into_first_content()
            .ok_or(CompletionError::EmptyResponse)
    }
}
