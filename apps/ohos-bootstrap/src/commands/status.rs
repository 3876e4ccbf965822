#![warn(clippy::pedantic)]

//! Status command.
//!
//! Shows the SDK release recorded in the prefix and the installed components.

use anyhow::Result;

use ohos_bootstrap::sdk::SdkPaths;

use super::GlobalArgs;

/// Executes the status command.
///
/// # Errors
///
/// Returns an error if the prefix cannot be read.
pub fn execute(global: &GlobalArgs) -> Result<()> {
    let config = global.config(true)?;
    let paths = SdkPaths::with_prefix(config.prefix);

    match paths.read_marker() {
        Some(release) => println!("OpenHarmony SDK {release} at {}", paths.prefix.display()),
        None => {
            println!("No OpenHarmony SDK installed at {}", paths.prefix.display());
            return Ok(());
        }
    }

    let installed = paths.installed_components()?;
    if installed.is_empty() {
        println!("No components installed.");
    }
    for (api_version, component) in &installed {
        println!("  {api_version}/{component}");
    }

    Ok(())
}
