#![warn(clippy::pedantic)]

//! Relocate command.
//!
//! Installs components from an SDK bundle already staged at
//! `<prefix>/ohos-sdk`. Nothing is downloaded.

use anyhow::Result;
use clap::Args;

use ohos_bootstrap::sdk::OhosBootstrapper;

use super::{GlobalArgs, print_report};

/// Arguments for the relocate command.
#[derive(Args)]
pub struct RelocateArgs {
    /// Parallel jobs hint. Components are always installed one at a time.
    #[arg(long, short, default_value_t = 0)]
    pub jobs: usize,
}

/// Executes the relocate command.
///
/// # Errors
///
/// Returns an error if a component archive fails to extract or move.
pub async fn execute(global: &GlobalArgs, args: &RelocateArgs) -> Result<()> {
    let bootstrapper = OhosBootstrapper::new(global.config(true)?)?;
    let report = bootstrapper.start(args.jobs).await?;
    print_report(&report);
    Ok(())
}
