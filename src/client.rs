use async_trait::async_trait;
use tracing::debug;

use crate::wire::{AdviceReply, AnalyzeRequest};

pub const ANALYZE_PATH: &str = "/api/analyze-poker-hand";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("advice endpoint unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("advice endpoint returned an unreadable body: {0}")]
    Decode(String),
}

/// The server-side advice endpoint as seen by the form.
#[async_trait]
pub trait AdviceService: Send + Sync {
    async fn analyze(&self, content: &str) -> Result<AdviceReply, ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpAdviceService {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpAdviceService {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), ANALYZE_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AdviceService for HttpAdviceService {
    async fn analyze(&self, content: &str) -> Result<AdviceReply, ClientError> {
        let request = AnalyzeRequest {
            gpt_string_content: content.to_string(),
        };
        let response = self.http.post(&self.endpoint).json(&request).send().await?;

        // The error body is still JSON, so status alone decides nothing here.
        let status = response.status();
        let body = response.text().await?;
        debug!(%status, bytes = body.len(), "advice endpoint replied");
        serde_json::from_str(&body).map_err(|err| ClientError::Decode(err.to_string()))
    }
}
