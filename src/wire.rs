use serde::{Deserialize, Serialize};

/// Body of `POST /api/analyze-poker-hand`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalyzeRequest {
    #[serde(rename = "gptStringContent")]
    pub gpt_string_content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalyzeResponse {
    pub advice: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

/// What the client reads back. Both the success and the error body decode
/// into this; only a non-empty `advice` counts as an answer.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct AdviceReply {
    #[serde(default)]
    pub advice: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
