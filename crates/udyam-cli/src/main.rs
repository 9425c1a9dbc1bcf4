//! # udyam CLI entry point
//!
//! Parses command-line arguments, initialises logging, and dispatches to
//! the subcommand handlers in `udyam_cli`.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use udyam_cli::remote::{run_lookup, run_verify_pan, LookupArgs, VerifyPanArgs};
use udyam_cli::session::{run_session_command, RunArgs};
use udyam_cli::validate::{run_gate, run_validate, GateArgs, ValidateArgs};

/// Udyam registration wizard toolchain.
///
/// Validates answer files, evaluates step gates, replays scripted wizard
/// sessions against the registration endpoint, and queries the pincode and
/// PAN verification services.
#[derive(Parser, Debug)]
#[command(name = "udyam", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a complete answer file against every field rule.
    Validate(ValidateArgs),

    /// Evaluate the gate of one wizard step.
    Gate(GateArgs),

    /// Replay a scripted wizard session.
    Run(RunArgs),

    /// Resolve a pincode to its locality.
    Lookup(LookupArgs),

    /// Pre-verify the PAN block of an answer file.
    VerifyPan(VerifyPanArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbosity flags.
    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if cli.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::Gate(args) => run_gate(&args),
        Commands::Run(args) => run_session_command(&args).await,
        Commands::Lookup(args) => run_lookup(&args).await,
        Commands::VerifyPan(args) => run_verify_pan(&args).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
