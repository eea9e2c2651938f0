//! The stack API seam
//!
//! Workflows only talk to the orchestration service through [`StackApi`].
//! [`super::CloudFormationApi`] is the production implementation; tests use
//! a scripted fake.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::status::StackStatus;
use crate::error::Result;

/// Summary of a stack as returned by a list call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackSummary {
    pub name: String,
    pub status: StackStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<String>,
}

impl StackSummary {
    pub fn new(name: impl Into<String>, status: StackStatus) -> Self {
        Self {
            name: name.into(),
            status,
            stack_id: None,
            status_reason: None,
        }
    }
}

/// Remote operations on infrastructure stacks
#[async_trait]
pub trait StackApi: Send + Sync {
    /// Submit a create request. Returns the stack id when the service sends one.
    async fn create_stack(&self, name: &str, template_body: &str) -> Result<Option<String>>;

    /// List stacks whose status is in `status_filter`, in service order.
    async fn list_stacks(&self, status_filter: &[StackStatus]) -> Result<Vec<StackSummary>>;

    /// Submit a delete request.
    async fn delete_stack(&self, name: &str) -> Result<()>;

    /// Current status of a stack, or `None` if the service says it does not exist.
    async fn describe_stack_status(&self, name: &str) -> Result<Option<StackStatus>>;
}
