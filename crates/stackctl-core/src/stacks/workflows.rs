//! Stack workflows - request plus wait
//!
//! Each workflow issues at most one mutating call, then hands off to the
//! wait loop. Nothing is retried here; the first error ends the workflow.

use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::api::{StackApi, StackSummary};
use super::status::StackStatus;
use crate::error::{CoreError, Result};
use crate::progress::{ProgressCallback, WaitOptions, WaitTarget, wait_for_stack};

/// Generate a unique stack name of the form `stack-<uuid>`
#[must_use]
pub fn generate_stack_name() -> String {
    format!("stack-{}", uuid::Uuid::new_v4())
}

/// Read a template file into a string
pub fn read_template(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| CoreError::Template {
        path: path.to_path_buf(),
        source,
    })
}

fn require_name(name: &str, operation: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(format!(
            "a stack name is required to {operation} a stack"
        )));
    }
    Ok(())
}

/// Create a stack and wait for completion
///
/// This is a convenience workflow that:
/// 1. Reads the template (no remote call if that fails)
/// 2. Submits the create request
/// 3. Polls the stack until `CREATE_COMPLETE` or a failure status
///
/// # Arguments
///
/// * `api` - The stack API
/// * `name` - Stack name; also the name polled by the wait
/// * `template_path` - Local template file
/// * `options` - Wait timeout and polling interval
/// * `on_progress` - Optional callback for progress updates
///
/// # Example
///
/// ```rust,ignore
/// use stackctl_core::stacks::workflows::create_stack_and_wait;
/// use stackctl_core::WaitOptions;
///
/// let status = create_stack_and_wait(
///     &api,
///     "my-stack",
///     "template.yaml".as_ref(),
///     &WaitOptions::default(),
///     None,  // No progress callback
/// ).await?;
/// ```
pub async fn create_stack_and_wait<A: StackApi + ?Sized>(
    api: &A,
    name: &str,
    template_path: &Path,
    options: &WaitOptions,
    on_progress: Option<ProgressCallback>,
) -> Result<StackStatus> {
    require_name(name, "create")?;

    // Step 1: Read the template
    let template_body = read_template(template_path)?;
    debug!(
        "Read template {} ({} bytes)",
        template_path.display(),
        template_body.len()
    );

    // Step 2: Create
    let stack_id = api.create_stack(name, &template_body).await?;
    info!("Create requested for stack {} (id: {:?})", name, stack_id);

    // Step 3: Poll until complete
    wait_for_stack(api, name, WaitTarget::CreateComplete, options, on_progress).await
}

/// Create a stack without waiting
///
/// Returns the stack id if the service sent one.
pub async fn create_stack<A: StackApi + ?Sized>(
    api: &A,
    name: &str,
    template_path: &Path,
) -> Result<Option<String>> {
    require_name(name, "create")?;
    let template_body = read_template(template_path)?;
    api.create_stack(name, &template_body).await
}

/// List every stack regardless of status
///
/// Order is exactly what the service returned; nothing is filtered or sorted.
pub async fn list_stacks<A: StackApi + ?Sized>(api: &A) -> Result<Vec<StackSummary>> {
    api.list_stacks(&StackStatus::ALL).await
}

/// Delete a stack and wait for completion
///
/// # Arguments
///
/// * `api` - The stack API
/// * `name` - The stack to delete
/// * `options` - Wait timeout and polling interval
/// * `on_progress` - Optional callback for progress updates
pub async fn delete_stack_and_wait<A: StackApi + ?Sized>(
    api: &A,
    name: &str,
    options: &WaitOptions,
    on_progress: Option<ProgressCallback>,
) -> Result<()> {
    require_name(name, "delete")?;

    // Step 1: Delete
    api.delete_stack(name).await?;
    info!("Delete requested for stack {}", name);

    // Step 2: Poll until gone
    wait_for_stack(api, name, WaitTarget::DeleteComplete, options, on_progress).await?;

    Ok(())
}

/// Delete a stack without waiting
pub async fn delete_stack<A: StackApi + ?Sized>(api: &A, name: &str) -> Result<()> {
    require_name(name, "delete")?;
    api.delete_stack(name).await
}
