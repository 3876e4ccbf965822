#![warn(clippy::pedantic)]

//! Relocation of staged SDK components into the version-keyed layout.
//!
//! The SDK bundle is staged at `<prefix>/ohos-sdk/<platform>/` and contains one
//! nested archive per component. Each wanted archive is extracted in place,
//! its `apiVersion` is read from the component's package descriptor, the
//! version directory `<prefix>/<apiVersion>` is recreated empty and the
//! component directory is moved to `<prefix>/<apiVersion>/<component>`.
//!
//! ## Process
//!
//! 1. Create the prefix and write the SDK release marker (best effort)
//! 2. Stop if nothing is staged
//! 3. Discover nested archives and keep the wanted components
//! 4. For each archive, in discovery order: extract, read the API version,
//!    replace the whole version directory, move the component into it
//! 5. Remove the staging directory (best effort)
//!
//! Archives are processed strictly one after another; two archives of the same
//! component share a working directory. The last component resolving to a
//! version wins: earlier contents of that version directory are discarded.

use std::io;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, bail};

use super::archive::{ExtractOutcome, extract_archive};
use super::component::{classify_path, is_wanted};
use super::locate::find_archives;
use super::metadata::{UNKNOWN_API_VERSION, read_api_version};
use super::paths::STAGING_DIR;
use super::{Platform, SdkPaths};

/// A component moved into its final location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledComponent {
    /// Component token, e.g. `native`.
    pub component: String,
    /// API version key the component was installed under.
    pub api_version: String,
    /// Final directory of the component.
    pub path: PathBuf,
}

/// Summary of a relocation run.
#[derive(Debug, Default)]
pub struct RelocationReport {
    /// Components installed, in processing order.
    pub installed: Vec<InstalledComponent>,
    /// Wanted archives skipped because their format is not supported.
    pub skipped: Vec<PathBuf>,
}

/// Runs the relocation pipeline for `platform` below `paths.prefix`.
///
/// A missing staging directory is not an error: the run records the release
/// marker and returns an empty report. The staging directory is removed once
/// every archive has been handled; after a fatal error it is left in place so
/// the failing archive can be inspected.
///
/// # Errors
///
/// Returns an error if:
/// - The prefix cannot be created
/// - A supported archive fails to extract
/// - A component directory cannot be replaced or moved
pub fn relocate(paths: &SdkPaths, platform: &Platform, release: &str) -> Result<RelocationReport> {
    std::fs::create_dir_all(&paths.prefix)
        .with_context(|| format!("Failed to create directory: {}", paths.prefix.display()))?;

    if let Err(err) = paths.write_marker(release) {
        tracing::debug!(error = %format!("{err:#}"), "Ignoring version marker failure");
    }

    let mut report = RelocationReport::default();

    if !paths.staging.is_dir() {
        tracing::debug!(staging = %paths.staging.display(), "Nothing staged, skipping relocation");
        return Ok(report);
    }

    let platform_dir = paths.platform_dir(platform);
    let archives: Vec<PathBuf> = find_archives(&platform_dir)
        .into_iter()
        .filter(|archive| is_wanted(classify_path(archive)))
        .collect();

    for archive in &archives {
        let token = classify_path(archive);
        match install_component(paths, &platform_dir, archive, token)? {
            Some(installed) => report.installed.push(installed),
            None => report.skipped.push(archive.clone()),
        }
    }

    std::fs::remove_dir_all(&paths.staging).ok();

    Ok(report)
}

/// Extracts one component archive and moves the component into place.
///
/// Returns `None` if the archive format is not supported.
fn install_component(
    paths: &SdkPaths,
    platform_dir: &Path,
    archive: &Path,
    token: &str,
) -> Result<Option<InstalledComponent>> {
    tracing::info!(archive = %archive.display(), "Extracting");

    match extract_archive(archive, platform_dir) {
        ExtractOutcome::Extracted => {}
        ExtractOutcome::UnrecognizedFormat => {
            tracing::warn!(archive = %archive.display(), "Unknown archive format, skipping");
            return Ok(None);
        }
        ExtractOutcome::Failed(err) => return Err(err),
    }

    let source = platform_dir.join(token);
    let api_version = resolve_api_version(&source);
    tracing::info!(component = token, api_version = %api_version, "Resolved component");

    let target = paths.component_dir(&api_version, token);
    move_into_place(&source, &paths.version_dir(&api_version), &target)
        .with_context(|| format!("Failed to install {} from {}", token, archive.display()))?;

    Ok(Some(InstalledComponent {
        component: token.to_string(),
        api_version,
        path: target,
    }))
}

/// Reads the component's API version, falling back to `unknown`.
///
/// Versions that are not usable as a single directory name below the prefix
/// also fall back to `unknown`.
fn resolve_api_version(component_root: &Path) -> String {
    match read_api_version(component_root) {
        Some(version) if is_version_key(&version) => version,
        Some(version) => {
            tracing::warn!(api_version = %version, "apiVersion is not a valid directory name");
            UNKNOWN_API_VERSION.to_string()
        }
        None => UNKNOWN_API_VERSION.to_string(),
    }
}

fn is_version_key(version: &str) -> bool {
    let mut components = Path::new(version).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && version != STAGING_DIR
        && !version.starts_with('.')
}

/// Recreates `version_dir` empty and moves `source` to `target` below it.
fn move_into_place(source: &Path, version_dir: &Path, target: &Path) -> Result<()> {
    if !source.is_dir() {
        bail!(
            "Component directory {} does not exist after extraction",
            source.display()
        );
    }

    if version_dir.is_dir() {
        tracing::debug!(path = %version_dir.display(), "Replacing version directory");
        std::fs::remove_dir_all(version_dir)
            .with_context(|| format!("Failed to remove {}", version_dir.display()))?;
    } else if version_dir.exists() {
        std::fs::remove_file(version_dir)
            .with_context(|| format!("Failed to remove {}", version_dir.display()))?;
    }

    std::fs::create_dir_all(version_dir)
        .with_context(|| format!("Failed to create directory: {}", version_dir.display()))?;

    match std::fs::rename(source, target) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
            fs_extra::dir::move_dir(source, version_dir, &fs_extra::dir::CopyOptions::new())
                .with_context(|| {
                    format!("Failed to move {} to {}", source.display(), target.display())
                })?;
            Ok(())
        }
        Err(err) => Err(err).with_context(|| {
            format!("Failed to move {} to {}", source.display(), target.display())
        }),
    }
}
