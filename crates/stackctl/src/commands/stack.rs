//! The create, list and delete operations
//!
//! Wraps the core workflows with argument validation, the progress spinner
//! and output formatting. Every function is generic over [`StackApi`] so the
//! whole path can run against a fake.

use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use stackctl_core::stacks::workflows;
use stackctl_core::{ProgressCallback, ProgressEvent, StackApi, StackStatus, WaitOptions};
use tracing::{debug, info};

use crate::error::{Result as CliResult, StackCtlError};
use crate::output::{OutputFormat, format_stack_lines, print_output};

/// Operation selected with `-o`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    List,
    Delete,
}

impl Operation {
    /// Parse an operation name; `None` for anything unrecognized
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "create" => Some(Self::Create),
            "list" => Some(Self::List),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// A validated request, ready to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackRequest {
    Create {
        name: String,
        template: PathBuf,
        /// The name was generated because none was given
        generated: bool,
    },
    List,
    Delete { name: String },
}

impl StackRequest {
    /// Check the arguments an operation needs before any client is built
    ///
    /// A blank name on create gets a generated `stack-<uuid>` name.
    pub fn validate(
        operation: Operation,
        name: Option<&str>,
        template: Option<&Path>,
    ) -> CliResult<Self> {
        let name = name.map(str::trim).filter(|n| !n.is_empty());

        match operation {
            Operation::Create => {
                let template = template.ok_or_else(|| StackCtlError::InvalidInput {
                    message: "a template file (-t) is required to create a stack".to_string(),
                })?;
                let (name, generated) = match name {
                    Some(name) => (name.to_string(), false),
                    None => {
                        let generated = workflows::generate_stack_name();
                        info!("No stack name given, using {}", generated);
                        (generated, true)
                    }
                };
                Ok(Self::Create {
                    name,
                    template: template.to_path_buf(),
                    generated,
                })
            }
            Operation::List => Ok(Self::List),
            Operation::Delete => {
                let name = name.ok_or_else(|| StackCtlError::InvalidInput {
                    message: "a stack name (-n) is required to delete a stack".to_string(),
                })?;
                Ok(Self::Delete {
                    name: name.to_string(),
                })
            }
        }
    }
}

/// How to run and report a request
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub format: OutputFormat,
    pub query: Option<String>,
    /// `None` returns as soon as the request is accepted
    pub wait: Option<WaitOptions>,
    pub show_progress: bool,
}

impl RunOptions {
    /// Format for structured output, `None` for the plain text lines
    ///
    /// Text has nothing to query, so a query switches it to JSON.
    pub fn structured_format(&self) -> Option<OutputFormat> {
        match self.format {
            OutputFormat::Text if self.query.is_none() => None,
            OutputFormat::Text => Some(OutputFormat::Json),
            other => Some(other),
        }
    }
}

/// Line announcing a generated stack name, shown with plain text output
///
/// Structured output carries the name in its record instead.
pub fn generated_name_notice(request: &StackRequest, options: &RunOptions) -> Option<String> {
    match request {
        StackRequest::Create {
            name,
            generated: true,
            ..
        } if options.structured_format().is_none() => {
            Some(format!("Using generated stack name {}", name))
        }
        _ => None,
    }
}

#[derive(Debug, Serialize)]
struct StackResult<'a> {
    name: &'a str,
    status: StackStatus,
}

/// Run a validated request against the stack API
pub async fn execute<A: StackApi + ?Sized>(
    api: &A,
    request: &StackRequest,
    options: &RunOptions,
) -> CliResult<()> {
    if let Some(notice) = generated_name_notice(request, options) {
        println!("{}", notice);
    }

    match request {
        StackRequest::Create { name, template, .. } => {
            handle_create(api, name, template, options).await
        }
        StackRequest::List => handle_list(api, options).await,
        StackRequest::Delete { name } => handle_delete(api, name, options).await,
    }
}

async fn handle_create<A: StackApi + ?Sized>(
    api: &A,
    name: &str,
    template: &Path,
    options: &RunOptions,
) -> CliResult<()> {
    debug!("Creating stack {} from {}", name, template.display());

    let result = match &options.wait {
        Some(wait) => {
            let (spinner, callback) = progress(name, "Creating", options.show_progress);
            let result =
                workflows::create_stack_and_wait(api, name, template, wait, callback).await;
            finish(spinner, &result);
            result
        }
        None => workflows::create_stack(api, name, template)
            .await
            .map(|_| StackStatus::CreateInProgress),
    };

    match result {
        Ok(status) => print_result(name, status, options),
        Err(e) => {
            println!("Could not create stack {}", name);
            Err(e.into())
        }
    }
}

async fn handle_list<A: StackApi + ?Sized>(api: &A, options: &RunOptions) -> CliResult<()> {
    let stacks = match workflows::list_stacks(api).await {
        Ok(stacks) => stacks,
        Err(e) => {
            println!("Could not list stack summary info");
            return Err(e.into());
        }
    };
    debug!("Listed {} stacks", stacks.len());

    match options.structured_format() {
        Some(format) => print_output(&stacks, format, options.query.as_deref())?,
        None => print!("{}", format_stack_lines(&stacks)),
    }
    Ok(())
}

async fn handle_delete<A: StackApi + ?Sized>(
    api: &A,
    name: &str,
    options: &RunOptions,
) -> CliResult<()> {
    debug!("Deleting stack {}", name);

    let result = match &options.wait {
        Some(wait) => {
            let (spinner, callback) = progress(name, "Deleting", options.show_progress);
            let result = workflows::delete_stack_and_wait(api, name, wait, callback)
                .await
                .map(|()| StackStatus::DeleteComplete);
            finish(spinner, &result);
            result
        }
        None => workflows::delete_stack(api, name)
            .await
            .map(|()| StackStatus::DeleteInProgress),
    };

    match result {
        Ok(status) => print_result(name, status, options),
        Err(e) => {
            println!("Could not delete stack {}", name);
            Err(e.into())
        }
    }
}

/// Text output stays silent on success; structured formats get a record
fn print_result(name: &str, status: StackStatus, options: &RunOptions) -> CliResult<()> {
    if let Some(format) = options.structured_format() {
        print_output(StackResult { name, status }, format, options.query.as_deref())?;
    }
    Ok(())
}

/// Spinner plus the callback that drives it
fn progress(
    stack: &str,
    verb: &str,
    show: bool,
) -> (Option<ProgressBar>, Option<ProgressCallback>) {
    if !show {
        return (None, None);
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    pb.set_message(format!("{} stack {}", verb, stack));

    let pb_clone = pb.clone();
    let callback: ProgressCallback = Box::new(move |event: ProgressEvent| match &event {
        ProgressEvent::Started { stack } => {
            pb_clone.set_message(format!("Waiting for stack {}", stack));
        }
        ProgressEvent::Polling { stack, status, .. } => {
            pb_clone.set_message(format!("Stack {}: {}", stack, format_stack_status(status)));
        }
        ProgressEvent::Completed { stack, status } => {
            pb_clone.finish_with_message(format!(
                "Stack {}: {}",
                stack,
                format_stack_status(status)
            ));
        }
        ProgressEvent::Failed { stack, error } => {
            pb_clone.abandon_with_message(format!("Stack {} failed: {}", stack, error));
        }
    });

    (Some(pb), Some(callback))
}

fn finish<T>(spinner: Option<ProgressBar>, result: &stackctl_core::Result<T>) {
    // Errors raised before the wait started never reach the callback
    if let (Some(pb), Err(e)) = (spinner, result)
        && !pb.is_finished()
    {
        pb.abandon_with_message(format!("{}", e));
    }
}

/// Format a stack status for display with status icons
fn format_stack_status(status: &str) -> String {
    if status.ends_with("_FAILED") || status == "ROLLBACK_COMPLETE" {
        format!("\u{2717} {}", status) // x mark
    } else if status.ends_with("_IN_PROGRESS") {
        format!("\u{21bb} {}", status) // arrow circle
    } else if status.ends_with("_COMPLETE") {
        format!("\u{2713} {}", status) // checkmark
    } else {
        status.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackctl_core::StackSummary;
    use stackctl_core::testing::{FailAt, FakeStackApi, StackCall};
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn options(format: OutputFormat) -> RunOptions {
        RunOptions {
            format,
            query: None,
            wait: Some(WaitOptions {
                timeout: Duration::from_secs(5),
                interval: Duration::from_millis(1),
            }),
            show_progress: false,
        }
    }

    #[test]
    fn test_parse_operation() {
        assert_eq!(Operation::parse("create"), Some(Operation::Create));
        assert_eq!(Operation::parse("list"), Some(Operation::List));
        assert_eq!(Operation::parse("delete"), Some(Operation::Delete));
        assert_eq!(Operation::parse("bogus"), None);
        assert_eq!(Operation::parse("LIST"), None);
        assert_eq!(Operation::parse(""), None);
    }

    #[test]
    fn test_create_requires_template() {
        let err = StackRequest::validate(Operation::Create, Some("web"), None).unwrap_err();
        assert!(matches!(err, StackCtlError::InvalidInput { .. }));
    }

    #[test]
    fn test_create_generates_name_when_blank() {
        let request =
            StackRequest::validate(Operation::Create, Some("  "), Some(Path::new("t.yaml")))
                .unwrap();
        match request {
            StackRequest::Create {
                name, generated, ..
            } => {
                assert!(name.starts_with("stack-"));
                assert!(generated);
            }
            other => panic!("unexpected request {other:?}"),
        }
    }

    #[test]
    fn test_given_name_is_not_generated() {
        let request =
            StackRequest::validate(Operation::Create, Some(" web "), Some(Path::new("t.yaml")))
                .unwrap();
        assert_eq!(
            request,
            StackRequest::Create {
                name: "web".to_string(),
                template: PathBuf::from("t.yaml"),
                generated: false,
            }
        );
        assert_eq!(
            generated_name_notice(&request, &options(OutputFormat::Text)),
            None
        );
    }

    #[test]
    fn test_generated_name_is_announced_in_text_output() {
        let request =
            StackRequest::validate(Operation::Create, None, Some(Path::new("t.yaml"))).unwrap();
        let StackRequest::Create { name, .. } = &request else {
            panic!("unexpected request {request:?}");
        };

        let notice = generated_name_notice(&request, &options(OutputFormat::Text)).unwrap();
        assert_eq!(notice, format!("Using generated stack name {}", name));

        // Structured output reports the name in its record
        assert_eq!(
            generated_name_notice(&request, &options(OutputFormat::Json)),
            None
        );
        let mut queried = options(OutputFormat::Text);
        queried.query = Some("name".to_string());
        assert_eq!(generated_name_notice(&request, &queried), None);
    }

    #[test]
    fn test_query_switches_text_to_json() {
        let mut opts = options(OutputFormat::Text);
        assert_eq!(opts.structured_format(), None);

        opts.query = Some("status".to_string());
        assert_eq!(opts.structured_format(), Some(OutputFormat::Json));

        opts.format = OutputFormat::Yaml;
        assert_eq!(opts.structured_format(), Some(OutputFormat::Yaml));
        assert_eq!(options(OutputFormat::Table).structured_format(), Some(OutputFormat::Table));
    }

    #[test]
    fn test_delete_requires_name() {
        assert!(StackRequest::validate(Operation::Delete, None, None).is_err());
        assert_eq!(
            StackRequest::validate(Operation::Delete, Some("web"), None).unwrap(),
            StackRequest::Delete {
                name: "web".to_string()
            }
        );
    }

    #[test]
    fn test_format_stack_status() {
        assert!(format_stack_status("CREATE_COMPLETE").starts_with('\u{2713}'));
        assert!(format_stack_status("DELETE_IN_PROGRESS").starts_with('\u{21bb}'));
        assert!(format_stack_status("CREATE_FAILED").starts_with('\u{2717}'));
        assert!(format_stack_status("ROLLBACK_COMPLETE").starts_with('\u{2717}'));
        assert_eq!(format_stack_status("DOES_NOT_EXIST"), "DOES_NOT_EXIST");
    }

    #[tokio::test]
    async fn test_create_then_wait() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("t.yaml");
        fs::write(&template, "Resources: {}").unwrap();
        let api = FakeStackApi::new().with_describe_script(vec![
            Some(StackStatus::CreateInProgress),
            Some(StackStatus::CreateComplete),
        ]);
        let request = StackRequest::Create {
            name: "web".to_string(),
            template,
            generated: false,
        };

        execute(&api, &request, &options(OutputFormat::Json))
            .await
            .unwrap();

        assert_eq!(api.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_create_no_wait_skips_describe() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("t.yaml");
        fs::write(&template, "Resources: {}").unwrap();
        let api = FakeStackApi::new();
        let mut opts = options(OutputFormat::Text);
        opts.wait = None;

        execute(
            &api,
            &StackRequest::Create {
                name: "web".to_string(),
                template,
                generated: false,
            },
            &opts,
        )
        .await
        .unwrap();

        assert!(matches!(&api.calls()[..], [StackCall::Create { .. }]));
    }

    #[tokio::test]
    async fn test_create_missing_template_fails_without_calls() {
        let api = FakeStackApi::new();
        let request = StackRequest::Create {
            name: "web".to_string(),
            template: PathBuf::from("/nonexistent/stackctl/t.yaml"),
            generated: false,
        };

        let err = execute(&api, &request, &options(OutputFormat::Text))
            .await
            .unwrap_err();

        assert!(matches!(err, StackCtlError::TemplateError { .. }));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_list_with_query() {
        let api = FakeStackApi::new().with_stacks(vec![
            StackSummary::new("web", StackStatus::CreateComplete),
            StackSummary::new("old", StackStatus::DeleteComplete),
        ]);
        let mut opts = options(OutputFormat::Json);
        opts.query = Some("[].name".to_string());

        execute(&api, &StackRequest::List, &opts).await.unwrap();

        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_list_failure_maps_to_api_error() {
        let api = FakeStackApi::new().fail_at(FailAt::List);

        let err = execute(&api, &StackRequest::List, &options(OutputFormat::Text))
            .await
            .unwrap_err();

        assert!(matches!(err, StackCtlError::ApiError { .. }));
    }

    #[tokio::test]
    async fn test_delete_wait_failure() {
        let api = FakeStackApi::new().with_describe_script(vec![Some(StackStatus::DeleteFailed)]);
        let request = StackRequest::Delete {
            name: "web".to_string(),
        };

        let err = execute(&api, &request, &options(OutputFormat::Text))
            .await
            .unwrap_err();

        assert!(matches!(err, StackCtlError::StackFailed { status, .. } if status == "DELETE_FAILED"));
    }

    #[tokio::test]
    async fn test_text_delete_with_query_prints_record() {
        let api = FakeStackApi::new().with_describe_script(vec![None]);
        let mut opts = options(OutputFormat::Text);
        opts.query = Some("status".to_string());

        execute(
            &api,
            &StackRequest::Delete {
                name: "web".to_string(),
            },
            &opts,
        )
        .await
        .unwrap();

        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_until_gone() {
        let api = FakeStackApi::new().with_describe_script(vec![
            Some(StackStatus::DeleteInProgress),
            None,
        ]);
        let request = StackRequest::Delete {
            name: "web".to_string(),
        };

        execute(&api, &request, &options(OutputFormat::Yaml))
            .await
            .unwrap();

        assert_eq!(
            api.calls(),
            vec![
                StackCall::Delete("web".to_string()),
                StackCall::Describe("web".to_string()),
                StackCall::Describe("web".to_string()),
            ]
        );
    }
}
