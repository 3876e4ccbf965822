#![warn(clippy::pedantic)]

//! `ohos-bootstrap` command line interface.
//!
//! ## Usage
//!
//! ```bash
//! ohos-bootstrap bootstrap             # Download, stage and install the SDK
//! ohos-bootstrap fetch                 # Download and verify the SDK bundle only
//! ohos-bootstrap relocate              # Install components from an existing staging tree
//! ohos-bootstrap status                # Show installed components
//! ```
//!
//! Log verbosity is controlled with `RUST_LOG` (default `info`).

mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::GlobalArgs;

#[derive(Parser)]
#[command(name = "ohos-bootstrap")]
#[command(version, about = "OpenHarmony SDK bootstrapper")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download, stage and install the SDK components
    Bootstrap(commands::bootstrap::BootstrapArgs),
    /// Download and verify the SDK bundle
    Fetch(commands::fetch::FetchArgs),
    /// Install components from an already staged SDK bundle
    Relocate(commands::relocate::RelocateArgs),
    /// Show the recorded SDK release and installed components
    Status,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Bootstrap(args) => commands::bootstrap::execute(&cli.global, args).await,
        Commands::Fetch(args) => commands::fetch::execute(&cli.global, args).await,
        Commands::Relocate(args) => commands::relocate::execute(&cli.global, args).await,
        Commands::Status => commands::status::execute(&cli.global),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
