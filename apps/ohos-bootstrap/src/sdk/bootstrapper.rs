#![warn(clippy::pedantic)]

//! OpenHarmony SDK bootstrapper.
//!
//! Ties the release tables, the downloader, staging extraction and the
//! relocation pipeline together. A bootstrap run is:
//!
//! 1. [`OhosBootstrapper::fetch`] - download and verify the SDK bundle
//! 2. [`OhosBootstrapper::extract`] - stage the bundle below `<prefix>/ohos-sdk`
//! 3. [`OhosBootstrapper::start`] - relocate the components by API version

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::archive::extract_stripped;
use super::download::fetch_verified;
use super::relocate::{RelocationReport, relocate};
use super::release::{SDK_VERSION, checksum_for, sdk_url};
use super::{Platform, SdkError, SdkPaths};

/// Leading directories stripped from the SDK bundle (its `ohos-sdk/` root).
const BUNDLE_STRIP_COMPONENTS: usize = 1;

/// Configuration read once when the bootstrapper is constructed.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Platform whose SDK bundle is installed.
    pub platform: Platform,
    /// Installation prefix.
    pub prefix: PathBuf,
    /// Never download; only use an already verified bundle.
    pub offline: bool,
}

/// A file to download and the checksum it must match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchStep {
    /// Download URL.
    pub url: String,
    /// Expected SHA-256 checksum (hex).
    pub checksum: String,
    /// Local path of the verified download.
    pub dest: PathBuf,
}

/// An archive to extract during staging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractStep {
    /// Archive to extract.
    pub archive: PathBuf,
    /// Number of leading path components dropped from every entry.
    pub strip: usize,
    /// Destination directory.
    pub dest: PathBuf,
}

/// Bootstrapper for the OpenHarmony SDK toolchain.
#[derive(Debug, Clone)]
pub struct OhosBootstrapper {
    platform: Platform,
    paths: SdkPaths,
    offline: bool,
    fetch_steps: Vec<FetchStep>,
    extract_steps: Vec<ExtractStep>,
}

impl OhosBootstrapper {
    /// Creates a bootstrapper and plans its fetch and extract steps.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::UnknownChecksum`] if no checksum is recorded for
    /// the platform's SDK bundle.
    pub fn new(config: BootstrapConfig) -> Result<Self> {
        let paths = SdkPaths::with_prefix(config.prefix);
        let file_name = config.platform.archive_file_name();
        let checksum = checksum_for(file_name)
            .ok_or_else(|| SdkError::UnknownChecksum(file_name.to_string()))?;

        let bundle = paths.download_path(file_name);
        let fetch_steps = vec![FetchStep {
            url: sdk_url(&config.platform),
            checksum: checksum.to_string(),
            dest: bundle.clone(),
        }];
        let extract_steps = vec![ExtractStep {
            archive: bundle,
            strip: BUNDLE_STRIP_COMPONENTS,
            dest: paths.staging.clone(),
        }];

        Ok(Self {
            platform: config.platform,
            paths,
            offline: config.offline,
            fetch_steps,
            extract_steps,
        })
    }

    /// Returns the installation paths.
    #[must_use]
    pub fn paths(&self) -> &SdkPaths {
        &self.paths
    }

    /// Returns the target platform.
    #[must_use]
    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Returns the planned downloads.
    #[must_use]
    pub fn fetch_steps(&self) -> &[FetchStep] {
        &self.fetch_steps
    }

    /// Returns the planned staging extractions.
    #[must_use]
    pub fn extract_steps(&self) -> &[ExtractStep] {
        &self.extract_steps
    }

    /// Downloads and verifies every planned file.
    ///
    /// # Errors
    ///
    /// Returns an error if a download fails or does not match its checksum.
    pub async fn fetch(&self) -> Result<()> {
        for step in &self.fetch_steps {
            fetch_verified(&step.url, &step.dest, &step.checksum, self.offline).await?;
        }
        Ok(())
    }

    /// Extracts every planned archive into the staging area.
    ///
    /// # Errors
    ///
    /// Returns an error if an archive is missing, unsupported or fails to extract.
    pub async fn extract(&self) -> Result<()> {
        let steps = self.extract_steps.clone();
        tokio::task::spawn_blocking(move || {
            for step in &steps {
                tracing::info!(
                    archive = %step.archive.display(),
                    dest = %step.dest.display(),
                    "Staging SDK bundle"
                );
                extract_stripped(&step.archive, &step.dest, step.strip).into_result(&step.archive)?;
            }
            Ok::<(), anyhow::Error>(())
        })
        .await
        .context("Staging task panicked")?
    }

    /// Relocates the staged components into the version-keyed layout.
    ///
    /// `jobs` is accepted for parity with other bootstrappers; archives are
    /// always processed one at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if extraction of a supported archive or a move fails.
    pub async fn start(&self, jobs: usize) -> Result<RelocationReport> {
        tracing::debug!(jobs, platform = %self.platform, "Starting SDK relocation");

        let paths = self.paths.clone();
        let platform = self.platform.clone();
        tokio::task::spawn_blocking(move || relocate(&paths, &platform, SDK_VERSION))
            .await
            .context("Relocation task panicked")?
    }

    /// Runs fetch, staging and relocation in order.
    ///
    /// # Errors
    ///
    /// Returns the first error of any step.
    pub async fn run(&self, jobs: usize) -> Result<RelocationReport> {
        self.fetch().await?;
        self.extract().await?;
        self.start(jobs).await
    }
}
