//! CLI structure and argument definitions

use clap::Parser;
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Create, list and delete CloudFormation stacks
#[derive(Parser, Debug)]
#[command(name = "stackctl")]
#[command(version, about = "Create, list and delete CloudFormation stacks")]
#[command(long_about = "
Create, list and delete CloudFormation stacks

Create and delete wait until the stack settles, showing a spinner while the
service works. Use --no-wait to return as soon as the request is accepted.

EXAMPLES:
    # Create a stack from a template and wait for CREATE_COMPLETE
    stackctl -o create -n my-stack -t template.yaml

    # List every stack in the account
    stackctl -o list

    # Only completed stacks, as JSON
    stackctl -o list -f json -q '[?status==`CREATE_COMPLETE`]'

    # Delete a stack and wait until it is gone
    stackctl -o delete -n my-stack

    # Use a profile from ~/.config/stackctl/config.toml
    stackctl -p dev -o list
")]
pub struct Cli {
    /// The operation to perform: create, list, or delete
    #[arg(long, short = 'o')]
    pub operation: String,

    /// The name of the stack to create or delete
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// The file containing the CloudFormation template
    #[arg(long, short = 't')]
    pub template: Option<PathBuf>,

    /// Profile to use for this command
    #[arg(long, short, env = "STACKCTL_PROFILE")]
    pub profile: Option<String>,

    /// Path to alternate configuration file
    #[arg(long, env = "STACKCTL_CONFIG_FILE")]
    pub config_file: Option<String>,

    /// AWS region, overriding the profile
    #[arg(long)]
    pub region: Option<String>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// JMESPath query to filter structured output
    #[arg(long, short = 'q')]
    pub query: Option<String>,

    /// Enable verbose logging
    #[arg(long, short, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Maximum time to wait in seconds
    #[arg(long, conflicts_with = "no_wait", value_parser = clap::value_parser!(u64).range(1..))]
    pub wait_timeout: Option<u64>,

    /// Polling interval in seconds
    #[arg(long, conflicts_with = "no_wait", value_parser = clap::value_parser!(u64).range(1..))]
    pub wait_interval: Option<u64>,

    /// Return once the request is accepted instead of waiting
    #[arg(long)]
    pub no_wait: bool,
}
