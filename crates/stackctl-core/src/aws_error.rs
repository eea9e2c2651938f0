//! Conversion from AWS SDK errors into [`CoreError`]
//!
//! Both SDK clients share the smithy error types, so one conversion covers
//! CloudFormation and Bedrock Runtime.

use aws_sdk_cloudformation::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use tracing::debug;

use crate::error::CoreError;

pub(crate) fn from_sdk_error<E>(operation: &str, err: SdkError<E>) -> CoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let code = err
        .as_service_error()
        .and_then(|e| e.code())
        .map(str::to_string);
    let message = err
        .as_service_error()
        .and_then(|e| e.message())
        .map(str::to_string)
        .unwrap_or_else(|| DisplayErrorContext(&err).to_string());

    debug!(operation, ?code, "SDK call failed: {}", message);

    CoreError::Service {
        operation: operation.to_string(),
        code,
        message,
    }
}
