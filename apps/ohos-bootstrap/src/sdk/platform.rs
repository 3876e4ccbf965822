#![warn(clippy::pedantic)]

//! Target platform identification.
//!
//! The platform decides which SDK bundle is fetched and which subdirectory of
//! the staged bundle holds the component archives.

use std::fmt;
use std::str::FromStr;

/// Bundle shipped for both Windows and Linux hosts.
const WINDOWS_LINUX_ARCHIVE: &str = "ohos-sdk-windows_linux-public.tar.gz";

/// Bundle shipped for macOS hosts.
const MAC_ARCHIVE: &str = "ohos-sdk-mac-public.tar.gz";

/// Platform the SDK is being bootstrapped for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Linux hosts.
    Linux,
    /// Windows hosts.
    Windows,
    /// macOS hosts.
    Darwin,
    /// Any other identifier, kept verbatim.
    Other(String),
}

impl Platform {
    /// Detects the platform of the running host.
    #[must_use]
    pub fn detect() -> Self {
        Self::from_id(std::env::consts::OS)
    }

    /// Parses a platform identifier.
    ///
    /// `macos` and `mac` are accepted as aliases of `darwin`. Unknown
    /// identifiers are preserved as [`Platform::Other`].
    #[must_use]
    pub fn from_id(id: &str) -> Self {
        match id {
            "linux" => Self::Linux,
            "windows" => Self::Windows,
            "darwin" | "macos" | "mac" => Self::Darwin,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the identifier this platform was parsed from.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Linux => "linux",
            Self::Windows => "windows",
            Self::Darwin => "darwin",
            Self::Other(id) => id,
        }
    }

    /// Name of the per-platform directory inside the staged SDK bundle.
    #[must_use]
    pub fn dir_name(&self) -> &str {
        match self {
            Self::Linux => "linux",
            Self::Windows => "windows",
            Self::Darwin => "mac",
            Self::Other(id) => id,
        }
    }

    /// File name of the SDK bundle published for this platform.
    #[must_use]
    pub fn archive_file_name(&self) -> &'static str {
        match self {
            Self::Darwin => MAC_ARCHIVE,
            _ => WINDOWS_LINUX_ARCHIVE,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Platform {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_id(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_platforms_map_to_directory_names() {
        assert_eq!(Platform::from_id("linux").dir_name(), "linux");
        assert_eq!(Platform::from_id("windows").dir_name(), "windows");
        assert_eq!(Platform::from_id("darwin").dir_name(), "mac");
    }

    #[test]
    fn unknown_platform_passes_through() {
        let platform = Platform::from_id("freebsd");
        assert_eq!(platform, Platform::Other("freebsd".to_string()));
        assert_eq!(platform.dir_name(), "freebsd");
        assert_eq!(platform.to_string(), "freebsd");
    }

    #[test]
    fn macos_aliases_resolve_to_darwin() {
        assert_eq!(Platform::from_id("macos"), Platform::Darwin);
        assert_eq!(Platform::from_id("mac"), Platform::Darwin);
    }

    #[test]
    fn archive_name_is_shared_by_windows_and_linux() {
        assert_eq!(
            Platform::Linux.archive_file_name(),
            Platform::Windows.archive_file_name()
        );
        assert_eq!(Platform::Darwin.archive_file_name(), MAC_ARCHIVE);
        assert_eq!(
            Platform::Other("ohos".to_string()).archive_file_name(),
            WINDOWS_LINUX_ARCHIVE
        );
    }

    #[test]
    fn parses_via_from_str() {
        let platform: Platform = "windows".parse().unwrap();
        assert_eq!(platform, Platform::Windows);
    }
}
