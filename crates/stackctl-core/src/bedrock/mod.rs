//! Foundation model invocation
//!
//! [`ModelRuntime`] is the seam for the Bedrock Runtime `InvokeModel` call.
//! [`invoke_claude`] builds a Claude v2 text-completion request on top of it.

pub mod api;
pub mod aws;
pub mod claude;

pub use api::{InvokeModelRequest, InvokeModelResponse, ModelRuntime};
pub use aws::BedrockRuntimeApi;
pub use claude::{CLAUDE_V2_MODEL_ID, ClaudeRequest, ClaudeResponse, JSON_CONTENT_TYPE, invoke_claude};
