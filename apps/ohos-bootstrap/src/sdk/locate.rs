#![warn(clippy::pedantic)]

//! Recursive discovery of nested archives in a staged SDK bundle.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Suffixes of the archive files picked up during discovery.
pub const ARCHIVE_SUFFIXES: &[&str] = &[".zip", ".tar.gz", ".tgz"];

/// Finds every archive file below `root`, at any depth.
///
/// Traversal is depth-first with directory entries sorted by file name, so the
/// result is stable for an unchanged tree. A missing root yields no archives.
/// Unreadable subtrees are skipped.
#[must_use]
pub fn find_archives(root: &Path) -> Vec<PathBuf> {
    if !root.is_dir() {
        return Vec::new();
    }

    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(has_archive_suffix)
        })
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Returns `true` if `name` ends with one of [`ARCHIVE_SUFFIXES`].
fn has_archive_suffix(name: &str) -> bool {
    ARCHIVE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}
