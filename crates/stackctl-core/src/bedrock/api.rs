//! The model invocation seam
//!
//! [`ModelRuntime`] is what [`invoke_claude`](super::invoke_claude) calls;
//! the SDK client and the test stubber both implement it.

use async_trait::async_trait;

use crate::error::Result;

/// Request for a single `InvokeModel` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeModelRequest {
    pub model_id: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Raw response body of an `InvokeModel` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeModelResponse {
    pub body: Vec<u8>,
}

/// Runs inference against a hosted foundation model
#[async_trait]
pub trait ModelRuntime: Send + Sync {
    async fn invoke_model(&self, request: InvokeModelRequest) -> Result<InvokeModelResponse>;
}
