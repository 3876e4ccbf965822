#![warn(clippy::pedantic)]

//! Component classification of nested SDK archives.
//!
//! Vendor bundles name their nested archives after the component they carry,
//! followed by platform and build details, e.g.
//! `native-linux-x64-6.0.0.36-Release.zip`. The component token is the
//! leading word of the file name.

use std::path::Path;

use super::release::WANTED_COMPONENTS;

/// Derives the component token from an archive file name.
///
/// Takes the part before the first `.`, then the part of that before the
/// first `-` or `_`. Returns an empty string for names starting with `.`.
///
/// ```
/// use ohos_bootstrap::sdk::classify;
///
/// assert_eq!(classify("native-api12.tar.gz"), "native");
/// assert_eq!(classify("js_sdk.zip"), "js");
/// assert_eq!(classify("previewer.tgz"), "previewer");
/// ```
#[must_use]
pub fn classify(file_name: &str) -> &str {
    let stem = file_name.split('.').next().unwrap_or_default();
    stem.split(['-', '_']).next().unwrap_or_default()
}

/// Classifies an archive by the file name component of its path.
#[must_use]
pub fn classify_path(archive: &Path) -> &str {
    archive
        .file_name()
        .and_then(|name| name.to_str())
        .map_or("", classify)
}

/// Returns `true` if the token names one of the installed components.
#[must_use]
pub fn is_wanted(token: &str) -> bool {
    WANTED_COMPONENTS.contains(&token)
}
