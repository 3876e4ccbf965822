#![warn(clippy::pedantic)]

//! Path management for the OpenHarmony SDK installation.
//!
//! All paths derive from the installation prefix. The default prefix is
//! `~/.ohos/toolchain/`, which can be overridden by setting the
//! `OHOS_TOOLCHAIN_PREFIX` environment variable.
//!
//! ## Directory Structure
//!
//! ```text
//! <prefix>/                   # Installation prefix (or OHOS_TOOLCHAIN_PREFIX)
//!   .ohos-sdk-version         # SDK release that produced this layout
//!   .downloads/               # Verified SDK bundles
//!   12/                       # Components declaring apiVersion 12
//!     native/
//!     toolchains/
//!   unknown/                  # Components without a readable apiVersion
//!   ohos-sdk/                 # Staging area, removed after relocation
//!     linux/                  # Per-platform nested archives
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::Platform;

/// Environment variable to override the default installation prefix.
pub const PREFIX_ENV: &str = "OHOS_TOOLCHAIN_PREFIX";

/// Name of the staging directory below the prefix.
pub const STAGING_DIR: &str = "ohos-sdk";

/// Name of the SDK release marker file below the prefix.
pub const VERSION_MARKER: &str = ".ohos-sdk-version";

const DOWNLOADS_DIR: &str = ".downloads";

/// Manages paths for an SDK installation prefix.
#[derive(Debug, Clone)]
pub struct SdkPaths {
    /// Installation prefix; version-keyed component trees live directly below it.
    pub prefix: PathBuf,
    /// Staging directory the SDK bundle is extracted into.
    pub staging: PathBuf,
    /// Directory for verified SDK bundles.
    pub downloads: PathBuf,
}

impl SdkPaths {
    /// Returns the default installation prefix.
    ///
    /// The prefix is determined by:
    /// 1. The `OHOS_TOOLCHAIN_PREFIX` environment variable if set
    /// 2. On Windows: `%APPDATA%\ohos\toolchain`
    /// 3. On Unix: `~/.ohos/toolchain`
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn default_prefix() -> Result<PathBuf> {
        if let Ok(prefix) = std::env::var(PREFIX_ENV) {
            return Ok(PathBuf::from(prefix));
        }

        #[cfg(windows)]
        let base = dirs::data_dir()
            .context("Cannot determine AppData directory. Set OHOS_TOOLCHAIN_PREFIX environment variable.")?
            .join("ohos");
        #[cfg(not(windows))]
        let base = dirs::home_dir()
            .context("Cannot determine home directory. Set OHOS_TOOLCHAIN_PREFIX environment variable.")?
            .join(".ohos");

        Ok(base.join("toolchain"))
    }

    /// Creates a new `SdkPaths` instance rooted at `prefix`.
    #[must_use = "returns new paths instance without side effects"]
    pub fn with_prefix(prefix: PathBuf) -> Self {
        Self {
            staging: prefix.join(STAGING_DIR),
            downloads: prefix.join(DOWNLOADS_DIR),
            prefix,
        }
    }

    /// Returns the staged per-platform directory holding the nested archives.
    #[must_use = "returns the path without side effects"]
    pub fn platform_dir(&self, platform: &Platform) -> PathBuf {
        self.staging.join(platform.dir_name())
    }

    /// Returns the path of the SDK release marker.
    #[must_use = "returns the path without side effects"]
    pub fn version_marker(&self) -> PathBuf {
        self.prefix.join(VERSION_MARKER)
    }

    /// Returns the directory holding all components of one API version.
    #[must_use = "returns the path without side effects"]
    pub fn version_dir(&self, api_version: &str) -> PathBuf {
        self.prefix.join(api_version)
    }

    /// Returns the final location of a component.
    #[must_use = "returns the path without side effects"]
    pub fn component_dir(&self, api_version: &str, component: &str) -> PathBuf {
        self.version_dir(api_version).join(component)
    }

    /// Returns the path for a downloaded bundle.
    #[must_use = "returns the path without side effects"]
    pub fn download_path(&self, filename: &str) -> PathBuf {
        self.downloads.join(filename)
    }

    /// Writes the SDK release marker.
    ///
    /// # Errors
    ///
    /// Returns an error if the marker cannot be written.
    pub fn write_marker(&self, release: &str) -> Result<()> {
        let marker = self.version_marker();
        std::fs::write(&marker, format!("{release}\n"))
            .with_context(|| format!("Failed to write SDK version to {}", marker.display()))
    }

    /// Returns the SDK release recorded in the marker, if any.
    #[must_use = "returns the recorded release without side effects"]
    pub fn read_marker(&self) -> Option<String> {
        let content = std::fs::read_to_string(self.version_marker()).ok()?;
        let release = content.trim();
        (!release.is_empty()).then(|| release.to_string())
    }

    /// Lists installed components as sorted `(api_version, component)` pairs.
    ///
    /// The staging and download directories are not reported.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix cannot be read.
    pub fn installed_components(&self) -> Result<Vec<(String, String)>> {
        if !self.prefix.exists() {
            return Ok(Vec::new());
        }

        let mut installed = Vec::new();
        for version_dir in list_dirs(&self.prefix)? {
            let Some(version) = dir_name(&version_dir) else {
                continue;
            };
            if version == STAGING_DIR || version.starts_with('.') {
                continue;
            }
            for component_dir in list_dirs(&version_dir)? {
                if let Some(component) = dir_name(&component_dir) {
                    installed.push((version.to_string(), component.to_string()));
                }
            }
        }

        installed.sort();
        Ok(installed)
    }
}

fn list_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| "Failed to read directory entry")?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    Ok(dirs)
}

fn dir_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}
