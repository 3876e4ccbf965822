#![warn(clippy::pedantic)]

//! Archive extraction for SDK bundles and their nested component archives.
//!
//! Two container formats are supported, selected by case-insensitive suffix:
//!
//! | Suffix              | Format                  |
//! |---------------------|-------------------------|
//! | `.zip`              | ZIP                     |
//! | `.tar.gz`, `.tgz`   | gzip-compressed tar     |
//!
//! Extraction never writes outside the destination directory: entry paths
//! must stay below it, and an entry whose parent resolves through a symbolic
//! link leading elsewhere is rejected. Symbolic links and Unix permission bits
//! are restored where the platform allows it.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use flate2::read::GzDecoder;

use super::SdkError;

/// Container format of an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// ZIP container.
    Zip,
    /// gzip-compressed tar container.
    TarGz,
}

impl ArchiveFormat {
    /// Detects the format from the archive's file name.
    ///
    /// Returns `None` for unrecognized suffixes.
    #[must_use]
    pub fn detect(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_lowercase();
        if name.ends_with(".zip") {
            Some(Self::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Self::TarGz)
        } else {
            None
        }
    }
}

/// Result of extracting a single archive.
#[derive(Debug)]
pub enum ExtractOutcome {
    /// Every entry was written to the destination.
    Extracted,
    /// The suffix is not a supported format; nothing was extracted.
    UnrecognizedFormat,
    /// A supported archive could not be extracted.
    Failed(anyhow::Error),
}

impl ExtractOutcome {
    /// Converts the outcome into a result where only a completed extraction
    /// is a success.
    ///
    /// # Errors
    ///
    /// Returns the extraction error, or [`SdkError::UnrecognizedFormat`].
    pub fn into_result(self, archive: &Path) -> Result<()> {
        match self {
            Self::Extracted => Ok(()),
            Self::UnrecognizedFormat => Err(SdkError::UnrecognizedFormat(archive.to_path_buf()).into()),
            Self::Failed(err) => Err(err),
        }
    }
}

/// Extracts an archive into `dest_dir`, keeping entry paths as stored.
///
/// The destination directory is created if it does not exist.
#[must_use = "the outcome reports whether anything was extracted"]
pub fn extract_archive(archive_path: &Path, dest_dir: &Path) -> ExtractOutcome {
    extract_stripped(archive_path, dest_dir, 0)
}

/// Extracts an archive into `dest_dir`, dropping the first `strip` path
/// components of every entry.
///
/// Entries with no path left after stripping (the enclosing directories
/// themselves) are skipped.
#[must_use = "the outcome reports whether anything was extracted"]
pub fn extract_stripped(archive_path: &Path, dest_dir: &Path, strip: usize) -> ExtractOutcome {
    if let Err(err) = std::fs::create_dir_all(dest_dir)
        .with_context(|| format!("Failed to create directory: {}", dest_dir.display()))
    {
        return ExtractOutcome::Failed(err);
    }

    let result = match ArchiveFormat::detect(archive_path) {
        Some(format) => OutputRoot::new(archive_path, dest_dir).and_then(|root| match format {
            ArchiveFormat::Zip => extract_zip(&root, strip),
            ArchiveFormat::TarGz => extract_tar_gz(&root, strip),
        }),
        None => return ExtractOutcome::UnrecognizedFormat,
    };

    match result {
        Ok(()) => ExtractOutcome::Extracted,
        Err(err) => ExtractOutcome::Failed(err.context(format!(
            "Failed to extract {} into {}",
            archive_path.display(),
            dest_dir.display()
        ))),
    }
}

/// Destination of one extraction.
struct OutputRoot<'a> {
    archive: &'a Path,
    dir: &'a Path,
    canonical: PathBuf,
}

impl<'a> OutputRoot<'a> {
    fn new(archive: &'a Path, dir: &'a Path) -> Result<Self> {
        let canonical = dir
            .canonicalize()
            .with_context(|| format!("Failed to resolve directory: {}", dir.display()))?;
        Ok(Self {
            archive,
            dir,
            canonical,
        })
    }

    fn unsafe_entry(&self, entry: &Path) -> anyhow::Error {
        SdkError::UnsafeEntry {
            archive: self.archive.to_path_buf(),
            entry: entry.display().to_string(),
        }
        .into()
    }

    /// Returns `true` if an existing ancestor of `relative` is a symbolic link
    /// resolving outside the destination.
    fn escapes_through_link(&self, relative: &Path) -> bool {
        let Some(parent) = relative.parent() else {
            return false;
        };

        let mut current = self.dir.to_path_buf();
        for component in parent.components() {
            current.push(component);
            match std::fs::symlink_metadata(&current) {
                Ok(meta) if meta.file_type().is_symlink() => match current.canonicalize() {
                    Ok(resolved) if resolved.starts_with(&self.canonical) => {}
                    _ => return true,
                },
                Ok(_) => {}
                Err(_) => return false,
            }
        }
        false
    }

    /// Prepares the output path of an entry: checks containment, creates the
    /// parent directories and removes a non-directory already at the path so
    /// that writing never follows an existing link.
    fn prepare(&self, entry: &Path, relative: &Path) -> Result<PathBuf> {
        if !is_contained(relative) || self.escapes_through_link(relative) {
            return Err(self.unsafe_entry(entry));
        }

        let output_path = self.dir.join(relative);
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let existing = std::fs::symlink_metadata(&output_path).ok();
        if existing.is_some_and(|meta| !meta.is_dir()) {
            std::fs::remove_file(&output_path)
                .with_context(|| format!("Failed to remove {}", output_path.display()))?;
        }

        Ok(output_path)
    }
}

fn extract_zip(root: &OutputRoot<'_>, strip: usize) -> Result<()> {
    let archive_path = root.archive;
    let file = File::open(archive_path)
        .with_context(|| format!("Failed to open archive: {}", archive_path.display()))?;

    let mut archive = zip::ZipArchive::new(BufReader::new(file))
        .with_context(|| format!("Failed to read ZIP archive: {}", archive_path.display()))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .with_context(|| format!("Failed to read archive entry {i}"))?;

        let Some(entry_path) = entry.enclosed_name() else {
            return Err(SdkError::UnsafeEntry {
                archive: archive_path.to_path_buf(),
                entry: entry.name().to_string(),
            }
            .into());
        };

        let Some(relative) = strip_components(&entry_path, strip) else {
            continue;
        };
        let output_path = root.prepare(&entry_path, &relative)?;

        if entry.is_dir() {
            std::fs::create_dir_all(&output_path)
                .with_context(|| format!("Failed to create directory: {}", output_path.display()))?;
            continue;
        }

        let mode = entry.unix_mode();
        if mode.is_some_and(is_symlink_mode) {
            let mut target = String::new();
            entry
                .read_to_string(&mut target)
                .with_context(|| format!("Failed to read link target for: {}", output_path.display()))?;
            write_symlink(Path::new(&target), &output_path)?;
            continue;
        }

        let mut outfile = File::create(&output_path)
            .with_context(|| format!("Failed to create file: {}", output_path.display()))?;

        std::io::copy(&mut entry, &mut outfile)
            .with_context(|| format!("Failed to extract: {}", output_path.display()))?;

        #[cfg(unix)]
        if let Some(mode) = mode {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&output_path, std::fs::Permissions::from_mode(mode & 0o7777))
                .with_context(|| format!("Failed to set permissions: {}", output_path.display()))?;
        }
    }

    Ok(())
}

fn extract_tar_gz(root: &OutputRoot<'_>, strip: usize) -> Result<()> {
    let archive_path = root.archive;
    let file = File::open(archive_path)
        .with_context(|| format!("Failed to open archive: {}", archive_path.display()))?;

    let mut archive = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
    archive.set_preserve_permissions(true);
    archive.set_overwrite(true);

    let entries = archive
        .entries()
        .with_context(|| format!("Failed to read tar archive: {}", archive_path.display()))?;

    for entry in entries {
        let mut entry = entry
            .with_context(|| format!("Failed to read entry in: {}", archive_path.display()))?;

        let entry_path = entry
            .path()
            .with_context(|| format!("Invalid entry path in: {}", archive_path.display()))?
            .into_owned();

        let Some(relative) = strip_components(&entry_path, strip) else {
            continue;
        };
        let output_path = root.prepare(&entry_path, &relative)?;

        if entry.header().entry_type().is_hard_link() {
            // Hard link targets are archive paths, not filesystem paths.
            let link_name = entry
                .link_name()
                .with_context(|| format!("Invalid link in: {}", archive_path.display()))?
                .map(std::borrow::Cow::into_owned);
            let source = link_name
                .as_deref()
                .and_then(|name| strip_components(name, strip))
                .filter(|name| is_contained(name) && !root.escapes_through_link(name))
                .ok_or_else(|| root.unsafe_entry(&entry_path))?;
            std::fs::hard_link(root.dir.join(source), &output_path)
                .with_context(|| format!("Failed to create hard link: {}", output_path.display()))?;
            continue;
        }

        entry
            .unpack(&output_path)
            .with_context(|| format!("Failed to extract: {}", output_path.display()))?;
    }

    Ok(())
}

/// Drops the first `strip` normal components of `path`.
///
/// `.` components are ignored. Returns `None` when nothing remains.
fn strip_components(path: &Path, strip: usize) -> Option<PathBuf> {
    let stripped: PathBuf = path
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .skip(strip)
        .collect();

    if stripped.as_os_str().is_empty() {
        None
    } else {
        Some(stripped)
    }
}

/// Returns `true` if joining `path` onto a directory stays inside it.
fn is_contained(path: &Path) -> bool {
    path.components()
        .all(|component| matches!(component, Component::Normal(_)))
}

fn is_symlink_mode(mode: u32) -> bool {
    mode & 0o170_000 == 0o120_000
}

#[cfg(unix)]
fn write_symlink(target: &Path, link: &Path) -> Result<()> {
    std::fs::remove_file(link).ok();
    std::os::unix::fs::symlink(target, link).with_context(|| {
        format!(
            "Failed to create symlink from {} to {}",
            link.display(),
            target.display()
        )
    })
}

/// Windows cannot always create symlinks; the link target is stored as a
/// plain file instead.
#[cfg(not(unix))]
fn write_symlink(target: &Path, link: &Path) -> Result<()> {
    std::fs::write(link, target.to_string_lossy().as_bytes())
        .with_context(|| format!("Failed to create file: {}", link.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::testutil::{write_tar_gz, write_zip};
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use predicates::prelude::*;

    #[test]
    fn detects_formats_case_insensitively() {
        assert_eq!(ArchiveFormat::detect(Path::new("a.zip")), Some(ArchiveFormat::Zip));
        assert_eq!(ArchiveFormat::detect(Path::new("a.ZIP")), Some(ArchiveFormat::Zip));
        assert_eq!(ArchiveFormat::detect(Path::new("a.tar.gz")), Some(ArchiveFormat::TarGz));
        assert_eq!(ArchiveFormat::detect(Path::new("A.TGZ")), Some(ArchiveFormat::TarGz));
        assert_eq!(ArchiveFormat::detect(Path::new("a.rar")), None);
        assert_eq!(ArchiveFormat::detect(Path::new("a.tar")), None);
    }

    #[test]
    fn extracts_zip_with_nested_directories() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("native-linux.zip");
        write_zip(
            &archive,
            &[
                ("native/", ""),
                ("native/oh-uni-package.json", r#"{"apiVersion": "12"}"#),
                ("native/sysroot/usr/include/stdio.h", "int printf();"),
            ],
        );

        let dest = temp.child("out");
        let outcome = extract_archive(&archive, dest.path());
        assert!(matches!(outcome, ExtractOutcome::Extracted));

        dest.child("native/oh-uni-package.json")
            .assert(predicate::str::contains("apiVersion"));
        dest.child("native/sysroot/usr/include/stdio.h")
            .assert("int printf();");
    }

    #[test]
    fn extracts_tar_gz_and_tgz() {
        let temp = TempDir::new().unwrap();
        for name in ["ets.tar.gz", "js.tgz"] {
            let archive = temp.path().join(name);
            write_tar_gz(&archive, &[("component/bin/tool", "#!/bin/sh\n")]);

            let dest = temp.child(format!("out-{name}"));
            let outcome = extract_archive(&archive, dest.path());
            assert!(matches!(outcome, ExtractOutcome::Extracted), "{name}");
            dest.child("component/bin/tool").assert("#!/bin/sh\n");
        }
    }

    #[test]
    fn unrecognized_suffix_extracts_nothing() {
        let temp = TempDir::new().unwrap();
        let archive = temp.child("toolchains.rar");
        archive.write_str("not really an archive").unwrap();

        let dest = temp.child("out");
        let outcome = extract_archive(archive.path(), dest.path());
        assert!(matches!(outcome, ExtractOutcome::UnrecognizedFormat));
        assert_eq!(std::fs::read_dir(dest.path()).unwrap().count(), 0);
    }

    #[test]
    fn corrupt_archive_fails_with_paths_in_message() {
        let temp = TempDir::new().unwrap();
        let archive = temp.child("native.zip");
        archive.write_str("garbage").unwrap();

        let dest = temp.child("out");
        let ExtractOutcome::Failed(err) = extract_archive(archive.path(), dest.path()) else {
            panic!("Expected extraction failure");
        };
        let msg = format!("{err:#}");
        assert!(msg.contains("native.zip"), "{msg}");
        assert!(msg.contains("out"), "{msg}");
    }

    #[test]
    fn zip_entry_escaping_destination_is_rejected() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("evil.zip");
        write_zip(&archive, &[("../escaped.txt", "boom")]);

        let dest = temp.child("out");
        let outcome = extract_archive(&archive, dest.path());
        assert!(matches!(outcome, ExtractOutcome::Failed(_)));
        temp.child("escaped.txt").assert(predicate::path::missing());
    }

    #[test]
    fn strip_drops_enclosing_directory() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("ohos-sdk-windows_linux-public.tar.gz");
        write_tar_gz(
            &archive,
            &[
                ("ohos-sdk/linux/native-linux.zip", "zip"),
                ("ohos-sdk/windows/native-windows.zip", "zip"),
            ],
        );

        let dest = temp.child("staging");
        extract_stripped(&archive, dest.path(), 1)
            .into_result(&archive)
            .unwrap();

        dest.child("linux/native-linux.zip").assert("zip");
        dest.child("windows/native-windows.zip").assert("zip");
        dest.child("ohos-sdk").assert(predicate::path::missing());
    }

    #[test]
    fn unrecognized_outcome_converts_to_typed_error() {
        let err = ExtractOutcome::UnrecognizedFormat
            .into_result(Path::new("x.7z"))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SdkError>(),
            Some(SdkError::UnrecognizedFormat(_))
        ));
    }

    #[test]
    fn strip_components_skips_current_dir() {
        assert_eq!(
            strip_components(Path::new("./ohos-sdk/linux/a.zip"), 1),
            Some(PathBuf::from("linux/a.zip"))
        );
        assert_eq!(strip_components(Path::new("ohos-sdk/"), 1), None);
        assert_eq!(
            strip_components(Path::new("a/b"), 0),
            Some(PathBuf::from("a/b"))
        );
    }

    #[test]
    fn containment_rejects_parent_and_root() {
        assert!(is_contained(Path::new("a/b/c")));
        assert!(!is_contained(Path::new("a/../../c")));
        assert!(!is_contained(Path::new("/etc/passwd")));
    }

    #[cfg(unix)]
    #[test]
    fn tar_symlinks_and_modes_are_preserved() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("toolchains.tar.gz");
        {
            let file = File::create(&archive).unwrap();
            let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
            let mut builder = tar::Builder::new(encoder);

            let body = b"#!/bin/sh\n";
            let mut header = tar::Header::new_gnu();
            header.set_size(body.len() as u64);
            header.set_mode(0o755);
            builder
                .append_data(&mut header, "toolchains/bin/clang-15", &body[..])
                .unwrap();

            let mut link = tar::Header::new_gnu();
            link.set_entry_type(tar::EntryType::Symlink);
            link.set_size(0);
            link.set_mode(0o777);
            builder
                .append_link(&mut link, "toolchains/bin/clang", "clang-15")
                .unwrap();

            builder.into_inner().unwrap().finish().unwrap();
        }

        let dest = temp.child("out");
        extract_archive(&archive, dest.path())
            .into_result(&archive)
            .unwrap();

        let binary = dest.path().join("toolchains/bin/clang-15");
        let mode = std::fs::metadata(&binary).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);

        let link = dest.path().join("toolchains/bin/clang");
        assert_eq!(std::fs::read_link(&link).unwrap(), PathBuf::from("clang-15"));
    }

    #[cfg(unix)]
    fn write_tar_with_link(archive: &Path, link: &str, target: &Path, file: &str) {
        let out = File::create(archive).unwrap();
        let encoder = flate2::write::GzEncoder::new(out, flate2::Compression::default());
        let mut builder = tar::Builder::new(encoder);

        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Symlink);
        header.set_size(0);
        header.set_mode(0o777);
        builder.append_link(&mut header, link, target).unwrap();

        let body = b"pwned";
        let mut header = tar::Header::new_gnu();
        header.set_size(body.len() as u64);
        header.set_mode(0o644);
        builder.append_data(&mut header, file, &body[..]).unwrap();

        builder.into_inner().unwrap().finish().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn tar_entry_through_outward_symlink_is_rejected() {
        let temp = TempDir::new().unwrap();
        let outside = temp.child("outside");
        outside.create_dir_all().unwrap();
        let archive = temp.path().join("native.tar.gz");
        write_tar_with_link(&archive, "native/evil", outside.path(), "native/evil/pwn.txt");

        let dest = temp.child("out");
        let ExtractOutcome::Failed(err) = extract_archive(&archive, dest.path()) else {
            panic!("Expected extraction failure");
        };
        assert!(matches!(
            err.downcast_ref::<SdkError>(),
            Some(SdkError::UnsafeEntry { .. })
        ));
        outside.child("pwn.txt").assert(predicate::path::missing());
    }

    #[cfg(unix)]
    #[test]
    fn zip_entry_through_outward_symlink_is_rejected() {
        use std::io::Write;

        let temp = TempDir::new().unwrap();
        let outside = temp.child("outside");
        outside.create_dir_all().unwrap();
        let archive = temp.path().join("native.zip");
        {
            let file = File::create(&archive).unwrap();
            let mut writer = zip::ZipWriter::new(file);
            let options = zip::write::SimpleFileOptions::default();
            writer
                .add_symlink("native/evil", outside.path().to_string_lossy(), options)
                .unwrap();
            writer.start_file("native/evil/pwn.txt", options).unwrap();
            writer.write_all(b"pwned").unwrap();
            writer.finish().unwrap();
        }

        let dest = temp.child("out");
        let outcome = extract_archive(&archive, dest.path());
        assert!(matches!(outcome, ExtractOutcome::Failed(_)));
        outside.child("pwn.txt").assert(predicate::path::missing());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_inside_destination_can_be_written_through() {
        let temp = TempDir::new().unwrap();
        let dest = temp.child("out");
        dest.child("native/real").create_dir_all().unwrap();
        let archive = temp.path().join("native.tar.gz");
        write_tar_with_link(
            &archive,
            "native/lib",
            Path::new("real"),
            "native/lib/libc.so",
        );

        extract_archive(&archive, dest.path())
            .into_result(&archive)
            .unwrap();
        dest.child("native/real/libc.so").assert("pwned");
    }

    #[cfg(unix)]
    #[test]
    fn existing_symlink_at_file_path_is_replaced_not_followed() {
        let temp = TempDir::new().unwrap();
        let outside = temp.child("victim.txt");
        outside.write_str("keep").unwrap();
        let dest = temp.child("out");
        dest.child("native").create_dir_all().unwrap();
        std::os::unix::fs::symlink(outside.path(), dest.path().join("native/tool")).unwrap();

        let archive = temp.path().join("native.tar.gz");
        write_tar_gz(&archive, &[("native/tool", "fresh")]);

        extract_archive(&archive, dest.path())
            .into_result(&archive)
            .unwrap();
        outside.assert("keep");
        dest.child("native/tool").assert("fresh");
    }
}
