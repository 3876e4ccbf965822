#![warn(clippy::pedantic)]

//! Bootstrap command.
//!
//! Downloads the SDK bundle for the target platform, verifies it, stages it
//! below the prefix and installs its components by API version.
//!
//! ## Usage
//!
//! ```bash
//! ohos-bootstrap bootstrap
//! ohos-bootstrap --platform darwin --prefix /opt/ohos bootstrap
//! ohos-bootstrap bootstrap --offline   # Reuse a previously downloaded bundle
//! ```

use anyhow::Result;
use clap::Args;

use ohos_bootstrap::sdk::OhosBootstrapper;

use super::{GlobalArgs, print_report};

/// Arguments for the bootstrap command.
#[derive(Args)]
pub struct BootstrapArgs {
    /// Do not download; fail unless a verified bundle is already cached.
    #[arg(long)]
    pub offline: bool,

    /// Parallel jobs hint. Components are always installed one at a time.
    #[arg(long, short, default_value_t = 0)]
    pub jobs: usize,
}

/// Executes the bootstrap command.
///
/// # Errors
///
/// Returns an error if the download, verification, staging or relocation fails.
pub async fn execute(global: &GlobalArgs, args: &BootstrapArgs) -> Result<()> {
    let bootstrapper = OhosBootstrapper::new(global.config(args.offline)?)?;

    println!(
        "Bootstrapping OpenHarmony SDK for {} into {}...",
        bootstrapper.platform(),
        bootstrapper.paths().prefix.display()
    );

    let report = bootstrapper.run(args.jobs).await?;
    print_report(&report);

    Ok(())
}
