//! CloudFormation-backed [`StackApi`]

use async_trait::async_trait;
use aws_sdk_cloudformation::Client;
use aws_sdk_cloudformation::types::StackStatus as CfnStackStatus;
use tracing::{debug, trace};

use super::api::{StackApi, StackSummary};
use super::status::StackStatus;
use crate::aws_error::from_sdk_error;
use crate::error::Result;

/// [`StackApi`] over the AWS CloudFormation SDK client
#[derive(Clone, Debug)]
pub struct CloudFormationApi {
    client: Client,
}

impl CloudFormationApi {
    /// Build a client from a loaded SDK config
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }

    /// Wrap an existing SDK client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

fn to_status(status: Option<&CfnStackStatus>) -> StackStatus {
    status
        .map(|s| StackStatus::from(s.as_str().to_string()))
        .unwrap_or_else(|| StackStatus::Other("UNKNOWN".to_string()))
}

#[async_trait]
impl StackApi for CloudFormationApi {
    async fn create_stack(&self, name: &str, template_body: &str) -> Result<Option<String>> {
        debug!("CreateStack {}", name);
        let output = self
            .client
            .create_stack()
            .stack_name(name)
            .template_body(template_body)
            .send()
            .await
            .map_err(|e| from_sdk_error("CreateStack", e))?;

        Ok(output.stack_id().map(str::to_string))
    }

    async fn list_stacks(&self, status_filter: &[StackStatus]) -> Result<Vec<StackSummary>> {
        let filter: Vec<CfnStackStatus> = status_filter
            .iter()
            .map(|s| CfnStackStatus::from(s.as_str()))
            .collect();

        let mut summaries = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            trace!("ListStacks page, token: {:?}", next_token);
            let output = self
                .client
                .list_stacks()
                .set_stack_status_filter(Some(filter.clone()))
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| from_sdk_error("ListStacks", e))?;

            for summary in output.stack_summaries() {
                summaries.push(StackSummary {
                    name: summary.stack_name().unwrap_or_default().to_string(),
                    status: to_status(summary.stack_status()),
                    stack_id: summary.stack_id().map(str::to_string),
                    status_reason: summary.stack_status_reason().map(str::to_string),
                });
            }

            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        debug!("ListStacks returned {} stacks", summaries.len());
        Ok(summaries)
    }

    async fn delete_stack(&self, name: &str) -> Result<()> {
        debug!("DeleteStack {}", name);
        self.client
            .delete_stack()
            .stack_name(name)
            .send()
            .await
            .map_err(|e| from_sdk_error("DeleteStack", e))?;
        Ok(())
    }

    async fn describe_stack_status(&self, name: &str) -> Result<Option<StackStatus>> {
        let result = self
            .client
            .describe_stacks()
            .stack_name(name)
            .send()
            .await
            .map_err(|e| from_sdk_error("DescribeStacks", e));

        match result {
            Ok(output) => Ok(output
                .stacks()
                .first()
                .map(|stack| to_status(stack.stack_status()))),
            // Describing a deleted stack by name is a ValidationError
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{WaitOptions, WaitTarget, wait_for_stack};
    use aws_sdk_cloudformation::error::ErrorMetadata;
    use aws_sdk_cloudformation::operation::describe_stacks::{
        DescribeStacksError, DescribeStacksOutput,
    };
    use aws_sdk_cloudformation::operation::list_stacks::ListStacksOutput;
    use aws_sdk_cloudformation::primitives::DateTime;
    use aws_sdk_cloudformation::types::{Stack, StackSummary as CfnStackSummary};
    use aws_smithy_mocks::{RuleMode, mock, mock_client};
    use std::time::Duration;

    fn summary(name: &str, status: CfnStackStatus) -> CfnStackSummary {
        CfnStackSummary::builder()
            .stack_name(name)
            .stack_status(status)
            .creation_time(DateTime::from_secs(0))
            .build()
    }

    fn described(name: &str, status: CfnStackStatus) -> DescribeStacksOutput {
        DescribeStacksOutput::builder()
            .stacks(
                Stack::builder()
                    .stack_name(name)
                    .stack_status(status)
                    .creation_time(DateTime::from_secs(0))
                    .build(),
            )
            .build()
    }

    fn validation_error(message: &str) -> DescribeStacksError {
        DescribeStacksError::generic(
            ErrorMetadata::builder()
                .code("ValidationError")
                .message(message)
                .build(),
        )
    }

    #[tokio::test]
    async fn test_list_stacks_follows_next_token() {
        let first_page = mock!(Client::list_stacks)
            .match_requests(|req| req.next_token().is_none())
            .then_output(|| {
                ListStacksOutput::builder()
                    .stack_summaries(summary("web", CfnStackStatus::CreateComplete))
                    .next_token("page-2")
                    .build()
            });
        let second_page = mock!(Client::list_stacks)
            .match_requests(|req| req.next_token() == Some("page-2"))
            .then_output(|| {
                ListStacksOutput::builder()
                    .stack_summaries(summary("old", CfnStackStatus::DeleteComplete))
                    .build()
            });
        let api = CloudFormationApi::from_client(mock_client!(
            aws_sdk_cloudformation,
            [&first_page, &second_page]
        ));

        let stacks = api.list_stacks(&StackStatus::ALL).await.unwrap();

        let listed: Vec<_> = stacks.iter().map(|s| (s.name.as_str(), &s.status)).collect();
        assert_eq!(
            listed,
            vec![
                ("web", &StackStatus::CreateComplete),
                ("old", &StackStatus::DeleteComplete),
            ]
        );
        assert_eq!(first_page.num_calls(), 1);
        assert_eq!(second_page.num_calls(), 1);
    }

    #[tokio::test]
    async fn test_describe_reports_status() {
        let rule = mock!(Client::describe_stacks)
            .match_requests(|req| req.stack_name() == Some("web"))
            .then_output(|| described("web", CfnStackStatus::DeleteInProgress));
        let api = CloudFormationApi::from_client(mock_client!(aws_sdk_cloudformation, [&rule]));

        let status = api.describe_stack_status("web").await.unwrap();

        assert_eq!(status, Some(StackStatus::DeleteInProgress));
    }

    #[tokio::test]
    async fn test_describe_missing_stack_is_none() {
        let rule = mock!(Client::describe_stacks)
            .then_error(|| validation_error("Stack with id gone does not exist"));
        let api = CloudFormationApi::from_client(mock_client!(aws_sdk_cloudformation, [&rule]));

        assert_eq!(api.describe_stack_status("gone").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_describe_other_validation_error_is_kept() {
        let rule = mock!(Client::describe_stacks)
            .then_error(|| validation_error("1 validation error detected: Value 'bad name'"));
        let api = CloudFormationApi::from_client(mock_client!(aws_sdk_cloudformation, [&rule]));

        let err = api.describe_stack_status("bad name").await.unwrap_err();

        assert!(!err.is_not_found());
        assert_eq!(err.code(), Some("ValidationError"));
    }

    #[tokio::test]
    async fn test_delete_wait_ends_when_stack_disappears() {
        let deleting = mock!(Client::describe_stacks)
            .then_output(|| described("web", CfnStackStatus::DeleteInProgress));
        let gone = mock!(Client::describe_stacks)
            .then_error(|| validation_error("Stack with id web does not exist"));
        let api = CloudFormationApi::from_client(mock_client!(
            aws_sdk_cloudformation,
            RuleMode::Sequential,
            [&deleting, &gone]
        ));
        let options = WaitOptions {
            timeout: Duration::from_secs(5),
            interval: Duration::from_millis(1),
        };

        let status = wait_for_stack(&api, "web", WaitTarget::DeleteComplete, &options, None)
            .await
            .unwrap();

        assert_eq!(status, StackStatus::DeleteComplete);
        assert_eq!(deleting.num_calls(), 1);
        assert_eq!(gone.num_calls(), 1);
    }
}
