//! kdns binary entrypoint.
//!
//! This is the main entry point for the `kdns` command-line tool.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use kdns_cli::cli::{Cli, Commands};
use kdns_cli::commands::{CheckConfigCommand, ParseCommand, ResolveCommand};
use kdns_cli::output::OutputFormat;

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kdns=warn")),
        )
        .with_writer(io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), kdns_cli::CliError> {
    let format = OutputFormat::new(cli.format);
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Resolve(args) => {
            let cmd = ResolveCommand::new(args);
            cmd.execute(&mut stdout, &format)?;
        }
        Commands::Parse(args) => {
            let cmd = ParseCommand::new(args);
            cmd.execute(&mut stdout, &format)?;
        }
        Commands::CheckConfig(args) => {
            let cmd = CheckConfigCommand::new(args);
            cmd.execute(&mut stdout, &format)?;
        }
    }

    Ok(())
}
