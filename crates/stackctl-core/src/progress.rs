//! Progress tracking and status polling for stack operations
//!
//! Create and delete requests return immediately while the service works on
//! the stack. This module polls the stack status until it is terminal for the
//! operation, with optional progress callbacks for UI updates.

use crate::error::{CoreError, Result};
use crate::stacks::{StackApi, StackStatus};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Progress events emitted while waiting on a stack
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Waiting has started
    Started { stack: String },
    /// Polling iteration with current status
    Polling {
        stack: String,
        status: String,
        elapsed: Duration,
    },
    /// Stack reached the awaited status
    Completed { stack: String, status: String },
    /// Stack reached a failure status or the wait errored
    Failed { stack: String, error: String },
}

/// Callback type for progress updates
///
/// The CLI uses this to drive its spinner.
pub type ProgressCallback = Box<dyn Fn(ProgressEvent) + Send + Sync>;

/// How long to wait and how often to poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Maximum time to wait for a terminal status
    pub timeout: Duration,
    /// Time between status checks
    pub interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(3600),
            interval: Duration::from_secs(30),
        }
    }
}

/// The operation being waited on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitTarget {
    CreateComplete,
    DeleteComplete,
}

/// Where a status leaves the wait loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Success,
    Failure,
    Pending,
}

impl WaitTarget {
    /// The status this target waits for
    #[must_use]
    pub fn expected(&self) -> StackStatus {
        match self {
            WaitTarget::CreateComplete => StackStatus::CreateComplete,
            WaitTarget::DeleteComplete => StackStatus::DeleteComplete,
        }
    }

    /// Classify an observed status. `None` means the stack does not exist.
    #[must_use]
    pub fn classify(&self, status: Option<&StackStatus>) -> WaitOutcome {
        use StackStatus::*;

        match (self, status) {
            (WaitTarget::CreateComplete, Some(CreateComplete)) => WaitOutcome::Success,
            (
                WaitTarget::CreateComplete,
                Some(CreateFailed | DeleteComplete | DeleteFailed | RollbackFailed | RollbackComplete)
                | None,
            ) => WaitOutcome::Failure,

            (WaitTarget::DeleteComplete, Some(DeleteComplete) | None) => WaitOutcome::Success,
            (
                WaitTarget::DeleteComplete,
                Some(
                    DeleteFailed
                    | CreateFailed
                    | RollbackFailed
                    | UpdateRollbackInProgress
                    | UpdateRollbackFailed
                    | UpdateRollbackComplete,
                ),
            ) => WaitOutcome::Failure,

            _ => WaitOutcome::Pending,
        }
    }
}

/// Poll a stack until it reaches a terminal status for `target`
///
/// # Arguments
///
/// * `api` - The stack API
/// * `stack` - The stack name used in the create or delete call
/// * `target` - Which operation is being waited on
/// * `options` - Timeout and polling interval
/// * `on_progress` - Optional callback for progress updates
///
/// # Returns
///
/// The final status (`DELETE_COMPLETE` is reported for a stack that no longer
/// exists), or an error if the stack failed, disappeared, or the wait timed out.
/// The stack is described at least once even when `options.timeout` is zero.
///
/// # Example
///
/// ```rust,ignore
/// use stackctl_core::{wait_for_stack, ProgressEvent, WaitOptions, WaitTarget};
///
/// api.delete_stack("my-stack").await?;
///
/// wait_for_stack(
///     &api,
///     "my-stack",
///     WaitTarget::DeleteComplete,
///     &WaitOptions::default(),
///     Some(Box::new(|event| {
///         if let ProgressEvent::Polling { status, elapsed, .. } = event {
///             println!("Status: {} ({:.0}s)", status, elapsed.as_secs());
///         }
///     })),
/// )
/// .await?;
/// ```
pub async fn wait_for_stack<A: StackApi + ?Sized>(
    api: &A,
    stack: &str,
    target: WaitTarget,
    options: &WaitOptions,
    on_progress: Option<ProgressCallback>,
) -> Result<StackStatus> {
    let start = Instant::now();

    emit(
        &on_progress,
        ProgressEvent::Started {
            stack: stack.to_string(),
        },
    );

    loop {
        let status = match api.describe_stack_status(stack).await {
            Ok(status) => status,
            Err(e) => {
                emit(
                    &on_progress,
                    ProgressEvent::Failed {
                        stack: stack.to_string(),
                        error: e.to_string(),
                    },
                );
                return Err(e);
            }
        };
        let status_label = status
            .as_ref()
            .map(|s| s.as_str().to_string())
            .unwrap_or_else(|| "DOES_NOT_EXIST".to_string());
        let elapsed = start.elapsed();
        trace!("Stack {} status: {}", stack, status_label);

        emit(
            &on_progress,
            ProgressEvent::Polling {
                stack: stack.to_string(),
                status: status_label,
                elapsed,
            },
        );

        match target.classify(status.as_ref()) {
            WaitOutcome::Success => {
                let final_status = status.unwrap_or_else(|| target.expected());
                debug!("Stack {} reached {}", stack, final_status);
                emit(
                    &on_progress,
                    ProgressEvent::Completed {
                        stack: stack.to_string(),
                        status: final_status.to_string(),
                    },
                );
                return Ok(final_status);
            }
            WaitOutcome::Failure => {
                let error = match status {
                    Some(status) => CoreError::StackFailed {
                        stack: stack.to_string(),
                        status: status.to_string(),
                        expected: target.expected().to_string(),
                    },
                    None => CoreError::StackNotFound {
                        stack: stack.to_string(),
                    },
                };
                emit(
                    &on_progress,
                    ProgressEvent::Failed {
                        stack: stack.to_string(),
                        error: error.to_string(),
                    },
                );
                return Err(error);
            }
            WaitOutcome::Pending => {
                // Always polled at least once before the timeout applies
                if elapsed >= options.timeout {
                    emit(
                        &on_progress,
                        ProgressEvent::Failed {
                            stack: stack.to_string(),
                            error: format!("timed out after {:?}", options.timeout),
                        },
                    );
                    return Err(CoreError::WaitTimeout(options.timeout));
                }
                tokio::time::sleep(options.interval).await;
            }
        }
    }
}

/// Helper to emit progress events
fn emit(callback: &Option<ProgressCallback>, event: ProgressEvent) {
    if let Some(cb) = callback {
        cb(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeStackApi, StackCall};
    use std::sync::{Arc, Mutex};

    fn fast() -> WaitOptions {
        WaitOptions {
            timeout: Duration::from_secs(5),
            interval: Duration::ZERO,
        }
    }

    #[test]
    fn test_create_target_classification() {
        let t = WaitTarget::CreateComplete;
        assert_eq!(t.classify(Some(&StackStatus::CreateComplete)), WaitOutcome::Success);
        assert_eq!(t.classify(Some(&StackStatus::CreateInProgress)), WaitOutcome::Pending);
        assert_eq!(t.classify(Some(&StackStatus::RollbackInProgress)), WaitOutcome::Pending);
        assert_eq!(t.classify(Some(&StackStatus::RollbackComplete)), WaitOutcome::Failure);
        assert_eq!(t.classify(Some(&StackStatus::CreateFailed)), WaitOutcome::Failure);
        assert_eq!(t.classify(None), WaitOutcome::Failure);
    }

    #[test]
    fn test_delete_target_classification() {
        let t = WaitTarget::DeleteComplete;
        assert_eq!(t.classify(Some(&StackStatus::DeleteComplete)), WaitOutcome::Success);
        assert_eq!(t.classify(None), WaitOutcome::Success);
        assert_eq!(t.classify(Some(&StackStatus::DeleteInProgress)), WaitOutcome::Pending);
        assert_eq!(t.classify(Some(&StackStatus::DeleteFailed)), WaitOutcome::Failure);
        assert_eq!(
            t.classify(Some(&StackStatus::UpdateRollbackComplete)),
            WaitOutcome::Failure
        );
    }

    #[test]
    fn test_unknown_status_keeps_polling() {
        let other = StackStatus::Other("IMPORT_IN_PROGRESS".to_string());
        assert_eq!(
            WaitTarget::CreateComplete.classify(Some(&other)),
            WaitOutcome::Pending
        );
        assert_eq!(
            WaitTarget::DeleteComplete.classify(Some(&other)),
            WaitOutcome::Pending
        );
    }

    #[tokio::test]
    async fn test_polls_until_complete_and_reports_progress() {
        let api = FakeStackApi::new().with_describe_script(vec![
            Some(StackStatus::CreateInProgress),
            Some(StackStatus::CreateInProgress),
            Some(StackStatus::CreateComplete),
        ]);
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();

        let status = wait_for_stack(
            &api,
            "demo",
            WaitTarget::CreateComplete,
            &fast(),
            Some(Box::new(move |e: ProgressEvent| sink.lock().unwrap().push(e))),
        )
        .await
        .unwrap();

        assert_eq!(status, StackStatus::CreateComplete);
        assert_eq!(api.calls().len(), 3);

        let events = events.lock().unwrap();
        assert!(matches!(events.first(), Some(ProgressEvent::Started { .. })));
        assert!(matches!(
            events.last(),
            Some(ProgressEvent::Completed { status, .. }) if status == "CREATE_COMPLETE"
        ));
    }

    #[tokio::test]
    async fn test_missing_stack_completes_delete() {
        let api = FakeStackApi::new().with_describe_script(vec![
            Some(StackStatus::DeleteInProgress),
            None,
        ]);

        let status = wait_for_stack(&api, "demo", WaitTarget::DeleteComplete, &fast(), None)
            .await
            .unwrap();

        assert_eq!(status, StackStatus::DeleteComplete);
    }

    #[tokio::test]
    async fn test_rollback_fails_create_wait() {
        let api = FakeStackApi::new().with_describe_script(vec![
            Some(StackStatus::RollbackInProgress),
            Some(StackStatus::RollbackComplete),
        ]);

        let err = wait_for_stack(&api, "demo", WaitTarget::CreateComplete, &fast(), None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CoreError::StackFailed { ref status, .. } if status == "ROLLBACK_COMPLETE"
        ));
    }

    #[tokio::test]
    async fn test_describe_error_aborts_wait() {
        let api = FakeStackApi::new()
            .with_describe_script(vec![Some(StackStatus::CreateInProgress)])
            .fail_describe_after(1);

        let err = wait_for_stack(&api, "demo", WaitTarget::CreateComplete, &fast(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Service { .. }));
        assert_eq!(
            api.calls(),
            vec![
                StackCall::Describe("demo".to_string()),
                StackCall::Describe("demo".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_times_out() {
        let api = FakeStackApi::new().with_describe_script(vec![Some(StackStatus::CreateInProgress)]);
        let options = WaitOptions {
            timeout: Duration::from_millis(20),
            interval: Duration::from_millis(5),
        };

        let err = wait_for_stack(&api, "demo", WaitTarget::CreateComplete, &options, None)
            .await
            .unwrap_err();

        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_zero_timeout_still_polls_once() {
        let api = FakeStackApi::new().with_describe_script(vec![Some(StackStatus::CreateComplete)]);
        let options = WaitOptions {
            timeout: Duration::ZERO,
            interval: Duration::from_millis(5),
        };

        let status = wait_for_stack(&api, "demo", WaitTarget::CreateComplete, &options, None)
            .await
            .unwrap();

        assert_eq!(status, StackStatus::CreateComplete);
        assert_eq!(api.calls(), vec![StackCall::Describe("demo".to_string())]);
    }

    #[tokio::test]
    async fn test_zero_timeout_gives_up_after_first_pending_status() {
        let api = FakeStackApi::new().with_describe_script(vec![Some(StackStatus::CreateInProgress)]);
        let options = WaitOptions {
            timeout: Duration::ZERO,
            interval: Duration::from_millis(5),
        };

        let err = wait_for_stack(&api, "demo", WaitTarget::CreateComplete, &options, None)
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(api.calls(), vec![StackCall::Describe("demo".to_string())]);
    }
}
