#![warn(clippy::pedantic)]

//! Fetch command.
//!
//! Downloads and verifies the SDK bundle without installing it.

use anyhow::Result;
use clap::Args;

use ohos_bootstrap::sdk::OhosBootstrapper;

use super::GlobalArgs;

/// Arguments for the fetch command.
#[derive(Args)]
pub struct FetchArgs {
    /// Only verify an already downloaded bundle.
    #[arg(long)]
    pub offline: bool,
}

/// Executes the fetch command.
///
/// # Errors
///
/// Returns an error if the download fails or the checksum does not match.
pub async fn execute(global: &GlobalArgs, args: &FetchArgs) -> Result<()> {
    let bootstrapper = OhosBootstrapper::new(global.config(args.offline)?)?;
    bootstrapper.fetch().await?;

    for step in bootstrapper.fetch_steps() {
        println!("Verified {}", step.dest.display());
    }

    Ok(())
}
