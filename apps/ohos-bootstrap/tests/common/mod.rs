//! Helpers for building staged SDK trees in integration tests.

#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes a gzip-compressed tar archive containing the given `(path, contents)` files.
pub fn write_tar_gz(path: &Path, files: &[(&str, &str)]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let file = File::create(path).unwrap();
    let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for (name, contents) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        builder
            .append_data(&mut header, name, contents.as_bytes())
            .unwrap();
    }

    builder.into_inner().unwrap().finish().unwrap();
}

/// Writes a ZIP archive containing the given `(path, contents)` files.
pub fn write_zip(path: &Path, files: &[(&str, &str)]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let file = File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    for (name, contents) in files {
        writer.start_file(*name, options).unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }

    writer.finish().unwrap();
}

/// Returns `<prefix>/ohos-sdk/linux`.
pub fn linux_staging(prefix: &Path) -> PathBuf {
    prefix.join("ohos-sdk").join("linux")
}

/// Stages the reference bundle: a whitelisted `native` archive declaring
/// API 12 and an archive outside the whitelist.
pub fn stage_reference_bundle(prefix: &Path) {
    let staging = linux_staging(prefix);
    write_tar_gz(
        &staging.join("native-pkg.tar.gz"),
        &[
            ("native/oh-uni-package.json", r#"{"apiVersion": "12"}"#),
            ("native/llvm/bin/clang", "clang"),
        ],
    );
    write_zip(&staging.join("random-extra.zip"), &[("random/readme.txt", "extra")]);
}

/// Lists every file below `root` relative to it, sorted.
pub fn tree(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().strip_prefix(root).unwrap().to_path_buf())
        .collect();
    files.sort();
    files
}
