#![warn(clippy::pedantic)]

//! Component metadata (`oh-uni-package.json`) lookup.
//!
//! Every SDK component ships a package descriptor declaring the API level it
//! targets:
//!
//! ```json
//! {
//!   "apiVersion": "12",
//!   "displayName": "Native",
//!   "path": "native",
//!   "version": "5.0.0.71"
//! }
//! ```
//!
//! Only `apiVersion` is read. Missing or malformed descriptors are not errors;
//! they simply yield no version.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

/// File name of the component package descriptor.
pub const METADATA_FILE: &str = "oh-uni-package.json";

/// Version key used when a component declares no API version.
pub const UNKNOWN_API_VERSION: &str = "unknown";

#[derive(Debug, Deserialize)]
struct PackageInfo {
    #[serde(rename = "apiVersion")]
    api_version: Option<Value>,
}

/// Locates the package descriptor of a component.
///
/// Looks directly inside `component_root` first, then one directory level
/// below it. Subdirectories are searched in file name order and the first
/// match wins.
#[must_use]
pub fn find_metadata(component_root: &Path) -> Option<PathBuf> {
    let direct = component_root.join(METADATA_FILE);
    if direct.is_file() {
        return Some(direct);
    }

    let mut subdirs: Vec<PathBuf> = std::fs::read_dir(component_root)
        .ok()?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    subdirs.sort();

    subdirs
        .into_iter()
        .map(|dir| dir.join(METADATA_FILE))
        .find(|candidate| candidate.is_file())
}

/// Reads the API version declared by a component.
///
/// Returns `None` if no descriptor exists, it cannot be read or parsed, or
/// `apiVersion` is absent, `null`, an array or an object. Strings are
/// returned verbatim; numbers and booleans as their JSON text.
///
/// Booleans keep their lowercase JSON spelling (`true`) and structured values
/// are never stringified, so a version key is always a plain scalar.
#[must_use]
pub fn read_api_version(component_root: &Path) -> Option<String> {
    let path = find_metadata(component_root)?;
    let content = std::fs::read_to_string(&path).ok()?;
    let info: PackageInfo = serde_json::from_str(&content).ok()?;

    match info.api_version? {
        Value::String(version) => Some(version),
        Value::Number(version) => Some(version.to_string()),
        Value::Bool(version) => Some(version.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
