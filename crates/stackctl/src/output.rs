//! Output formatting for command results
//!
//! Structured formats (json, yaml, table) go through an optional JMESPath
//! query first. The text format is the plain line-per-stack listing.

use anyhow::{Context, Result};
use comfy_table::Table;
use jpx_core::Runtime;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::OnceLock;

use stackctl_core::StackSummary;

static JMESPATH_RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// JMESPath runtime with the extended function library
pub fn get_jmespath_runtime() -> &'static Runtime {
    JMESPATH_RUNTIME.get_or_init(|| Runtime::builder().with_all_extensions().build())
}

/// Quote bare backtick literals so they parse as JSON.
///
/// JMESPath allows `` `foo` `` as shorthand for `` `"foo"` ``, which the
/// runtime rejects. Valid JSON literals are left untouched.
///
/// - `` [?status==`CREATE_COMPLETE`] `` -> `` [?status==`"CREATE_COMPLETE"`] ``
/// - `` `123` `` -> `` `123` ``
fn normalize_backtick_literals(query: &str) -> String {
    static BACKTICK_RE: OnceLock<Regex> = OnceLock::new();
    let re = BACKTICK_RE.get_or_init(|| {
        Regex::new(r"`([^`\\]*(?:\\.[^`\\]*)*)`").expect("backtick pattern is valid")
    });

    re.replace_all(query, |caps: &regex::Captures| {
        let content = &caps[1];
        let trimmed = content.trim();

        if serde_json::from_str::<Value>(trimmed).is_ok() {
            format!("`{}`", content)
        } else {
            let escaped = trimmed.replace('\\', "\\\\").replace('"', "\\\"");
            format!("`\"{}\"`", escaped)
        }
    })
    .into_owned()
}

/// Compile a JMESPath expression with the extended runtime
pub fn compile_jmespath(
    query: &str,
) -> Result<jpx_core::Expression<'static>, jpx_core::JmespathError> {
    let normalized = normalize_backtick_literals(query);
    get_jmespath_runtime().compile(&normalized)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Default)]
pub enum OutputFormat {
    /// Plain lines, one per stack
    #[default]
    Text,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Human-readable table
    Table,
}

/// Apply an optional JMESPath query to serializable data
pub fn apply_query<T: Serialize>(data: T, query: Option<&str>) -> Result<Value> {
    let json_value = serde_json::to_value(data)?;

    match query {
        Some(query_str) => {
            let expr = compile_jmespath(query_str)
                .with_context(|| format!("Invalid JMESPath expression: {}", query_str))?;
            Ok(expr.search(&json_value).context("JMESPath query failed")?)
        }
        None => Ok(json_value),
    }
}

/// Render data in a structured format
///
/// Text is rendered as pretty JSON here; callers that have a line format
/// of their own handle text before reaching this point.
pub fn render<T: Serialize>(data: T, format: OutputFormat, query: Option<&str>) -> Result<String> {
    let json_value = apply_query(data, query)?;

    let rendered = match format {
        OutputFormat::Json | OutputFormat::Text => serde_json::to_string_pretty(&json_value)?,
        OutputFormat::Yaml => serde_yaml::to_string(&json_value)?,
        OutputFormat::Table => render_table(&json_value),
    };
    Ok(rendered)
}

pub fn print_output<T: Serialize>(
    data: T,
    format: OutputFormat,
    query: Option<&str>,
) -> Result<()> {
    println!("{}", render(data, format, query)?);
    Ok(())
}

/// `<name>, Status: <STATUS>` per stack, then a blank line
pub fn format_stack_lines(stacks: &[StackSummary]) -> String {
    let mut out = String::new();
    for stack in stacks {
        out.push_str(&format!("{}, Status: {}\n", stack.name, stack.status));
    }
    out.push('\n');
    out
}

fn render_table(value: &Value) -> String {
    match value {
        Value::Array(arr) if !arr.is_empty() => {
            let mut table = Table::new();

            if let Value::Object(first) = &arr[0] {
                let headers: Vec<String> = first.keys().cloned().collect();
                table.set_header(&headers);

                for item in arr {
                    if let Value::Object(obj) = item {
                        let row: Vec<String> = headers
                            .iter()
                            .map(|h| format_value(obj.get(h).unwrap_or(&Value::Null)))
                            .collect();
                        table.add_row(row);
                    }
                }
            } else {
                table.set_header(vec!["Value"]);
                for item in arr {
                    table.add_row(vec![format_value(item)]);
                }
            }

            table.to_string()
        }
        Value::Object(obj) => {
            let mut table = Table::new();
            table.set_header(vec!["Key", "Value"]);

            for (key, val) in obj {
                table.add_row(vec![key.clone(), format_value(val)]);
            }

            table.to_string()
        }
        _ => format_value(value),
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}
