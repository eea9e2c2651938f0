//! Bedrock Runtime-backed [`ModelRuntime`]

use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::primitives::Blob;
use tracing::debug;

use super::api::{InvokeModelRequest, InvokeModelResponse, ModelRuntime};
use crate::aws_error::from_sdk_error;
use crate::error::Result;

/// [`ModelRuntime`] over the AWS Bedrock Runtime SDK client
#[derive(Clone, Debug)]
pub struct BedrockRuntimeApi {
    client: Client,
}

impl BedrockRuntimeApi {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ModelRuntime for BedrockRuntimeApi {
    async fn invoke_model(&self, request: InvokeModelRequest) -> Result<InvokeModelResponse> {
        debug!(
            "InvokeModel {} ({} byte body)",
            request.model_id,
            request.body.len()
        );
        let output = self
            .client
            .invoke_model()
            .model_id(request.model_id)
            .content_type(request.content_type)
            .body(Blob::new(request.body))
            .send()
            .await
            .map_err(|e| from_sdk_error("InvokeModel", e))?;

        Ok(InvokeModelResponse {
            body: output.body().as_ref().to_vec(),
        })
    }
}
