//! Claude v2 text completion over [`ModelRuntime`]

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::api::{InvokeModelRequest, ModelRuntime};
use crate::error::Result;

pub const CLAUDE_V2_MODEL_ID: &str = "anthropic.claude-v2";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Request body for the Claude v2 text-completion API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaudeRequest {
    pub prompt: String,
    pub max_tokens_to_sample: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop_sequences: Vec<String>,
}

impl ClaudeRequest {
    /// Wrap a user prompt in the Human/Assistant turn format
    pub fn new(prompt: &str) -> Self {
        Self {
            prompt: format!("Human: {prompt}\n\nAssistant:"),
            max_tokens_to_sample: 200,
            temperature: Some(0.5),
            stop_sequences: vec!["\n\nHuman:".to_string()],
        }
    }

    /// JSON body as sent on the wire
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Response body of the Claude v2 text-completion API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaudeResponse {
    pub completion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
}

/// Send a prompt to Claude v2 and return the completion text
pub async fn invoke_claude<R: ModelRuntime + ?Sized>(runtime: &R, prompt: &str) -> Result<String> {
    let body = ClaudeRequest::new(prompt).to_bytes()?;

    let response = runtime
        .invoke_model(InvokeModelRequest {
            model_id: CLAUDE_V2_MODEL_ID.to_string(),
            content_type: JSON_CONTENT_TYPE.to_string(),
            body,
        })
        .await?;

    let parsed: ClaudeResponse = serde_json::from_slice(&response.body)?;
    debug!("Claude returned {} chars", parsed.completion.len());
    Ok(parsed.completion)
}
