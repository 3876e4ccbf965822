#![warn(clippy::pedantic)]

//! Subcommands of the `ohos-bootstrap` CLI.

pub mod bootstrap;
pub mod fetch;
pub mod relocate;
pub mod status;

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use ohos_bootstrap::sdk::{BootstrapConfig, InstalledComponent, Platform, RelocationReport, SdkPaths};

/// Options shared by every subcommand.
#[derive(Args)]
pub struct GlobalArgs {
    /// Installation prefix [default: ~/.ohos/toolchain]
    #[arg(long, global = true, env = "OHOS_TOOLCHAIN_PREFIX")]
    pub prefix: Option<PathBuf>,

    /// Target platform: linux, windows or darwin [default: host]
    #[arg(long, global = true, env = "OHOS_PLATFORM")]
    pub platform: Option<String>,
}

impl GlobalArgs {
    /// Builds the bootstrap configuration from flags and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no prefix is given and the default cannot be determined.
    pub fn config(&self, offline: bool) -> Result<BootstrapConfig> {
        let prefix = match &self.prefix {
            Some(prefix) => prefix.clone(),
            None => SdkPaths::default_prefix()?,
        };
        let platform = self
            .platform
            .as_deref()
            .map_or_else(Platform::detect, Platform::from_id);

        Ok(BootstrapConfig {
            platform,
            prefix,
            offline,
        })
    }
}

/// Prints the components installed by a relocation run.
pub fn print_report(report: &RelocationReport) {
    if report.installed.is_empty() {
        println!("No SDK components were installed.");
    }
    for InstalledComponent {
        component,
        api_version,
        path,
    } in &report.installed
    {
        println!("  {component:<12} api {api_version:<8} {}", path.display());
    }
    for archive in &report.skipped {
        println!("  skipped (unsupported format): {}", archive.display());
    }
}
