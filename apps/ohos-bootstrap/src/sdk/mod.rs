#![warn(clippy::pedantic)]

//! OpenHarmony SDK installation.
//!
//! This module fetches the OpenHarmony SDK bundle, stages it below the
//! installation prefix and relocates its components into a layout keyed by
//! the API version each component declares.
//!
//! ## Module Structure
//!
//! - [`platform`] - Target platform identification
//! - [`release`] - Pinned SDK release, URLs and checksums
//! - [`paths`] - Installation prefix path management
//! - [`download`] - HTTP download with progress and retries
//! - [`verify`] - SHA256 checksum verification
//! - [`archive`] - ZIP and tar.gz extraction
//! - [`locate`] - Nested archive discovery
//! - [`component`] - Component classification of archive names
//! - [`metadata`] - Component `apiVersion` lookup
//! - [`relocate`] - Version-keyed relocation pipeline
//! - [`bootstrapper`] - Fetch, stage and relocate orchestration

pub mod archive;
pub mod bootstrapper;
pub mod component;
pub mod download;
pub mod error;
pub mod locate;
pub mod metadata;
pub mod paths;
pub mod platform;
pub mod relocate;
pub mod release;
pub mod verify;

#[cfg(test)]
mod testutil;

pub use archive::{ArchiveFormat, ExtractOutcome, extract_archive, extract_stripped};
pub use bootstrapper::{BootstrapConfig, OhosBootstrapper};
pub use component::{classify, is_wanted};
pub use error::SdkError;
pub use locate::find_archives;
pub use metadata::read_api_version;
pub use paths::SdkPaths;
pub use platform::Platform;
pub use relocate::{InstalledComponent, RelocationReport, relocate};
pub use verify::verify_checksum;
