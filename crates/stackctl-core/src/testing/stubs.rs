//! Canned stubs for the model invocation tests

use crate::bedrock::{
    CLAUDE_V2_MODEL_ID, ClaudeResponse, InvokeModelRequest, InvokeModelResponse, JSON_CONTENT_TYPE,
};

use super::stubber::{Stub, StubError};

/// Completion text every Claude stub answers with
pub const FAKE_COMPLETION: &str = "A fake response";

/// Stub for one Claude v2 `InvokeModel` call
///
/// The expected input carries `request_bytes` verbatim as its body. The
/// output is always `{"completion":"A fake response"}`.
pub fn stub_invoke_claude(
    request_bytes: Vec<u8>,
    raise_err: Option<StubError>,
) -> Stub<InvokeModelRequest, InvokeModelResponse> {
    let response = ClaudeResponse {
        completion: FAKE_COMPLETION.to_string(),
        stop_reason: None,
    };
    // Only a broken fixture can fail here
    let response_bytes =
        serde_json::to_vec(&response).expect("canned Claude response must serialize");

    Stub {
        operation_name: "InvokeModel".to_string(),
        input: InvokeModelRequest {
            model_id: CLAUDE_V2_MODEL_ID.to_string(),
            content_type: JSON_CONTENT_TYPE.to_string(),
            body: request_bytes,
        },
        output: InvokeModelResponse {
            body: response_bytes,
        },
        error: raise_err,
    }
}
