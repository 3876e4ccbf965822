#![warn(clippy::pedantic)]

//! Static release tables for the OpenHarmony SDK.
//!
//! The bootstrapper does not resolve releases dynamically: the version, the
//! download location and the expected checksums are pinned here.

use super::Platform;

/// SDK release installed by this bootstrapper.
///
/// Used in the download URL and written to the version marker.
pub const SDK_VERSION: &str = "6.0";

/// Mirror hosting the SDK release bundles.
const SDK_BASE_URL: &str = "https://repo.huaweicloud.com/openharmony/os";

/// SHA-256 checksums of the published bundles, keyed by file name.
// TODO: the 6.0 mac bundle is not published yet; refresh its checksum once it is.
const SDK_CHECKSUMS: &[(&str, &str)] = &[
    (
        "ohos-sdk-windows_linux-public.tar.gz",
        "a315834ac133625efc912bd078f3e2b2550868d04aef1b5aa4f9679c8b3c9d8e",
    ),
    (
        "ohos-sdk-mac-public.tar.gz",
        "e4dea057e8f57a567ae8e6d45a3a20cafa10bc774c1e5f13ad6f154baaa6985c",
    ),
];

/// Components extracted from the bundle. Every other nested archive is ignored.
pub const WANTED_COMPONENTS: &[&str] = &["native", "toolchains", "ets", "js", "previewer"];

/// Returns the download URL of the SDK bundle for `platform`.
#[must_use]
pub fn sdk_url(platform: &Platform) -> String {
    format!(
        "{SDK_BASE_URL}/{SDK_VERSION}-Release/{}",
        platform.archive_file_name()
    )
}

/// Returns the expected SHA-256 checksum for a bundle file name.
#[must_use]
pub fn checksum_for(file_name: &str) -> Option<&'static str> {
    SDK_CHECKSUMS
        .iter()
        .find(|(name, _)| *name == file_name)
        .map(|(_, sum)| *sum)
}
