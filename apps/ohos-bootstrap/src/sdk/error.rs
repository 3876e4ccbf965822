#![warn(clippy::pedantic)]

//! Typed errors for the SDK bootstrapper.
//!
//! Most fallible operations return [`anyhow::Result`] with context attached.
//! The variants here are the failures a caller may want to match on.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the SDK fetch, staging and relocation steps.
#[derive(Debug, Error)]
pub enum SdkError {
    /// A downloaded file did not hash to the expected value.
    #[error("checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// File that was verified.
        path: PathBuf,
        /// Expected SHA-256 digest (hex).
        expected: String,
        /// Actual SHA-256 digest (hex).
        actual: String,
    },

    /// No checksum is recorded for the given archive file name.
    #[error("no checksum recorded for SDK archive {0}")]
    UnknownChecksum(String),

    /// The archive suffix is not one of the supported container formats.
    #[error("unrecognized archive format: {0}")]
    UnrecognizedFormat(PathBuf),

    /// An archive entry would be written outside the destination directory.
    #[error("archive entry escapes destination: {entry} in {archive}")]
    UnsafeEntry {
        /// Archive being extracted.
        archive: PathBuf,
        /// Offending entry path as stored in the archive.
        entry: String,
    },

    /// Offline mode was requested but no verified archive is cached.
    #[error("offline mode: {0} is not cached, run without --offline to download it")]
    Offline(PathBuf),
}
