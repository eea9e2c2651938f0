//! Error types for stackctl
//!
//! Core and config errors are mapped into [`StackCtlError`], which knows how
//! to print itself as a diagnostic with tips.

use colored::Colorize;
use stackctl_core::{ConfigError, CoreError};
use thiserror::Error;

/// Cargo-style diagnostic formatter for CLI errors.
///
/// Produces structured output like:
/// ```text
/// error: a template file is required to create a stack
///
///   tip: pass the template with -t:
///       stackctl -o create -n my-stack -t template.yaml
/// ```
pub struct CliDiagnostic {
    message: String,
    detail: Option<String>,
    tips: Vec<(String, Vec<String>)>,
}

impl CliDiagnostic {
    pub fn error(message: &str) -> Self {
        Self {
            message: message.to_string(),
            detail: None,
            tips: Vec::new(),
        }
    }

    /// Add a detail line below the error message.
    pub fn detail(mut self, text: &str) -> Self {
        self.detail = Some(text.to_string());
        self
    }

    /// Add a tip with optional example commands.
    pub fn tip(mut self, description: &str, commands: &[&str]) -> Self {
        self.tips.push((
            description.to_string(),
            commands.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    /// Plain-text rendering, without colors
    pub fn render(&self) -> String {
        let mut out = format!("error: {}\n", self.message);
        if let Some(detail) = &self.detail {
            out.push_str(&format!("  {}\n", detail));
        }
        for (description, commands) in &self.tips {
            out.push_str(&format!("\n  tip: {}\n", description));
            for cmd in commands {
                out.push_str(&format!("      {}\n", cmd));
            }
        }
        out
    }

    /// Print the diagnostic to stderr with colored formatting.
    pub fn print(&self) {
        eprint!("{}{}", "error".red().bold(), ": ".bold());
        eprintln!("{}", self.message);

        if let Some(detail) = &self.detail {
            eprintln!("  {}", detail);
        }

        for (description, commands) in &self.tips {
            eprintln!();
            eprint!("  {}{}", "tip".yellow().bold(), ": ".bold());
            eprintln!("{}", description);
            for cmd in commands {
                eprintln!("      {}", cmd);
            }
        }
    }
}

/// Main error type for the stackctl binary
#[derive(Error, Debug)]
pub enum StackCtlError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Cannot read template '{path}': {message}")]
    TemplateError { path: String, message: String },

    #[error("API error: {message}")]
    ApiError {
        code: Option<String>,
        message: String,
    },

    #[error("Request throttled: {message}")]
    Throttled { message: String },

    #[error("Stack '{stack}' ended in {status}")]
    StackFailed { stack: String, status: String },

    #[error("Stack '{stack}' does not exist")]
    StackNotFound { stack: String },

    #[error("Timeout: {message}")]
    Timeout { message: String },

    #[error("Output formatting error: {message}")]
    OutputError { message: String },
}

/// Result type for stackctl operations
pub type Result<T> = std::result::Result<T, StackCtlError>;

impl StackCtlError {
    /// Get helpful suggestions for resolving this error
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            StackCtlError::ProfileNotFound { name } => vec![
                format!("Add a [profiles.{}] table to the config file", name),
                "Check the profile name spelling".to_string(),
                "Point at another file with --config-file".to_string(),
            ],
            StackCtlError::InvalidInput { message } if message.contains("template") => vec![
                "Pass the template file: stackctl -o create -n <name> -t <template>".to_string(),
            ],
            StackCtlError::InvalidInput { message } if message.contains("name") => vec![
                "Pass the stack name: stackctl -o delete -n <name>".to_string(),
                "List existing stacks: stackctl -o list".to_string(),
            ],
            StackCtlError::TemplateError { path, .. } => vec![
                format!("Check that the file exists: {}", path),
                "Verify file permissions are correct".to_string(),
            ],
            StackCtlError::ApiError { code: Some(code), .. }
                if code == "ExpiredToken" || code == "InvalidClientTokenId" =>
            {
                vec![
                    "Refresh your AWS credentials".to_string(),
                    "Select another AWS profile with the aws_profile setting".to_string(),
                ]
            }
            StackCtlError::ApiError { code: Some(code), .. } if code == "AlreadyExistsException" => {
                vec!["Choose another stack name or delete the existing stack first".to_string()]
            }
            StackCtlError::ApiError { message, .. } if message.contains("does not exist") => vec![
                "List existing stacks: stackctl -o list".to_string(),
                "Check that you're using the correct region".to_string(),
            ],
            StackCtlError::Throttled { .. } => vec![
                "Wait a moment and run the command again".to_string(),
                "Raise retry.max_attempts in your profile".to_string(),
            ],
            StackCtlError::StackFailed { .. } => vec![
                "Inspect the stack events in the CloudFormation console".to_string(),
                "Validate the template before creating the stack".to_string(),
            ],
            StackCtlError::Timeout { .. } => vec![
                "The operation may still finish; check with: stackctl -o list".to_string(),
                "Wait longer with --wait-timeout <seconds>".to_string(),
            ],
            StackCtlError::Configuration(_) => vec![
                "Check the config file syntax".to_string(),
                "Point at another file with --config-file".to_string(),
            ],
            _ => vec![],
        }
    }

    pub fn diagnostic(&self) -> CliDiagnostic {
        let mut diag = CliDiagnostic::error(&self.to_string());

        if let StackCtlError::ApiError {
            code: Some(code), ..
        } = self
        {
            diag = diag.detail(&format!("service error code: {}", code));
        }

        for suggestion in self.suggestions() {
            diag = diag.tip(&suggestion, &[]);
        }

        diag
    }

    /// Print a cargo-style diagnostic to stderr using colored formatting.
    pub fn print_diagnostic(&self) {
        self.diagnostic().print();
    }
}

impl From<CoreError> for StackCtlError {
    fn from(err: CoreError) -> Self {
        if err.is_throttled() {
            return StackCtlError::Throttled {
                message: err.to_string(),
            };
        }

        match err {
            CoreError::Template { path, source } => StackCtlError::TemplateError {
                path: path.display().to_string(),
                message: source.to_string(),
            },
            CoreError::Service { code, message, .. } => StackCtlError::ApiError { code, message },
            CoreError::StackFailed { stack, status, .. } => {
                StackCtlError::StackFailed { stack, status }
            }
            CoreError::StackNotFound { stack } => StackCtlError::StackNotFound { stack },
            CoreError::WaitTimeout(duration) => StackCtlError::Timeout {
                message: format!("stack still not settled after {} seconds", duration.as_secs()),
            },
            CoreError::Validation(message) => StackCtlError::InvalidInput { message },
            CoreError::Serialization(e) => StackCtlError::OutputError {
                message: e.to_string(),
            },
        }
    }
}

impl From<ConfigError> for StackCtlError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ProfileNotFound { name } => StackCtlError::ProfileNotFound { name },
            other => StackCtlError::Configuration(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for StackCtlError {
    fn from(err: anyhow::Error) -> Self {
        StackCtlError::OutputError {
            message: format!("{:#}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_template_error_keeps_path() {
        let err = StackCtlError::from(CoreError::Template {
            path: "missing.yaml".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        });
        assert!(matches!(&err, StackCtlError::TemplateError { path, .. } if path == "missing.yaml"));
        assert!(err.suggestions()[0].contains("missing.yaml"));
    }

    #[test]
    fn test_throttling_maps_to_throttled() {
        let err = StackCtlError::from(CoreError::Service {
            operation: "ListStacks".to_string(),
            code: Some("Throttling".to_string()),
            message: "Rate exceeded".to_string(),
        });
        assert!(matches!(err, StackCtlError::Throttled { .. }));
    }

    #[test]
    fn test_timeout_message_in_seconds() {
        let err = StackCtlError::from(CoreError::WaitTimeout(Duration::from_secs(90)));
        assert!(err.to_string().contains("90 seconds"));
    }

    #[test]
    fn test_profile_not_found_from_config() {
        let err = StackCtlError::from(ConfigError::ProfileNotFound {
            name: "prod".to_string(),
        });
        assert_eq!(err.to_string(), "Profile 'prod' not found");
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn test_diagnostic_lists_code_and_tips() {
        let err = StackCtlError::ApiError {
            code: Some("AlreadyExistsException".to_string()),
            message: "Stack [web] already exists".to_string(),
        };
        let rendered = err.diagnostic().render();

        assert!(rendered.starts_with("error: API error: Stack [web] already exists"));
        assert!(rendered.contains("service error code: AlreadyExistsException"));
        assert!(rendered.contains("tip: Choose another stack name"));
    }
}
