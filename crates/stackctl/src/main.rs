use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use tracing::{debug, info, trace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod connection;
mod error;
mod output;

use cli::Cli;
use commands::stack::{Operation, RunOptions, StackRequest};
use connection::{ConnectionManager, Overrides};
use error::StackCtlError;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level
    init_tracing(cli.verbose);

    if let Err(e) = execute_command(&cli).await {
        e.print_diagnostic();
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    // RUST_LOG wins over the verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "stackctl=warn,stackctl_core=warn,aws_config=error",
            1 => "stackctl=info,stackctl_core=info,aws_config=warn",
            2 => "stackctl=debug,stackctl_core=debug,aws_config=info,aws_smithy_runtime=info",
            _ => "stackctl=trace,stackctl_core=trace,aws_config=debug,aws_smithy_runtime=debug",
        };
        tracing_subscriber::EnvFilter::new(level)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .init();

    debug!("Tracing initialized with verbosity level: {}", verbose);
}

async fn execute_command(cli: &Cli) -> Result<(), StackCtlError> {
    trace!("Parsed arguments: {:?}", cli);

    let Some(operation) = Operation::parse(&cli.operation) else {
        println!("Unrecognized operation: {}", cli.operation);
        return Ok(());
    };

    // Validate before touching config or building a client
    let request = StackRequest::validate(operation, cli.name.as_deref(), cli.template.as_deref())?;
    info!("Operation: {:?}", request);

    let conn_mgr = ConnectionManager::load(cli.config_file.as_deref())?;
    debug!("Config path: {:?}", conn_mgr.config_path);

    let settings = conn_mgr.resolve(
        cli.profile.as_deref(),
        &Overrides {
            region: cli.region.clone(),
            wait_timeout: cli.wait_timeout,
            wait_interval: cli.wait_interval,
        },
    )?;

    let options = RunOptions {
        format: cli.format,
        query: cli.query.clone(),
        wait: (!cli.no_wait).then_some(settings.wait),
        show_progress: std::io::stderr().is_terminal(),
    };

    let api = conn_mgr.stack_api(&settings).await;

    let start = std::time::Instant::now();
    let result = commands::stack::execute(&api, &request, &options).await;
    debug!("Operation finished in {:?}", start.elapsed());
    result
}
