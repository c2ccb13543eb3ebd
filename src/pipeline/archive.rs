// src/pipeline/archive.rs

//! Zip archiving of the output directory.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{AppError, Result};

/// Result of archiving a directory.
#[derive(Debug, Clone)]
pub struct ArchiveReport {
    pub path: PathBuf,
    pub files: usize,
    pub skipped: usize,
}

/// Archive location for a requested name: its extension becomes `.zip`.
pub fn archive_path(zip_name: &Path) -> PathBuf {
    zip_name.with_extension("zip")
}

/// Zip `source_dir` into [`archive_path`]`(zip_name)` on a blocking thread.
pub async fn run_archive(source_dir: &Path, zip_name: &Path) -> Result<ArchiveReport> {
    let source_dir = source_dir.to_path_buf();
    let zip_name = zip_name.to_path_buf();
    tokio::task::spawn_blocking(move || create_archive(&source_dir, &zip_name))
        .await
        .map_err(|e| AppError::Io(std::io::Error::other(e)))?
}

/// Zip every file under `source_dir`, with paths relative to it.
///
/// Unreadable files are skipped. The archive itself is left out when it
/// lies inside `source_dir`.
pub fn create_archive(source_dir: &Path, zip_name: &Path) -> Result<ArchiveReport> {
    let path = archive_path(zip_name);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(&path)?;
    let own_path = path.canonicalize().ok();
    let mut writer = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut report = ArchiveReport {
        path,
        files: 0,
        skipped: 0,
    };

    for entry in WalkDir::new(source_dir).min_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("skipping unreadable entry: {}", e);
                report.skipped += 1;
                continue;
            }
        };

        let entry_path = entry.path();
        if own_path.is_some() && entry_path.canonicalize().ok() == own_path {
            continue;
        }
        let Some(name) = entry_name(source_dir, entry_path) else {
            continue;
        };

        if entry.file_type().is_dir() {
            writer.add_directory(name, options)?;
            continue;
        }

        match fs::read(entry_path) {
            Ok(bytes) => {
                writer.start_file(name, options)?;
                writer.write_all(&bytes)?;
                report.files += 1;
            }
            Err(e) => {
                log::debug!("skipping {}: {}", entry_path.display(), e);
                report.skipped += 1;
            }
        }
    }

    writer.finish()?;
    Ok(report)
}

/// Archive entry name: the relative path joined with `/`.
fn entry_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn test_archive_path() {
        assert_eq!(archive_path(Path::new("icons")), PathBuf::from("icons.zip"));
        assert_eq!(archive_path(Path::new("icons.zip")), PathBuf::from("icons.zip"));
        assert_eq!(
            archive_path(Path::new("out/icons.tar")),
            PathBuf::from("out/icons.zip")
        );
    }

    #[test]
    fn test_create_archive_keeps_relative_paths() {
        let src = TempDir::new().unwrap();
        fs::write(src.path().join("mdi-home.svg"), "<svg>home</svg>").unwrap();
        fs::create_dir(src.path().join("Navigation")).unwrap();
        fs::write(src.path().join("Navigation/mdi-arrow.svg"), "<svg>arrow</svg>").unwrap();

        let dest = TempDir::new().unwrap();
        let report = create_archive(src.path(), &dest.path().join("icons")).unwrap();

        assert_eq!(report.files, 2);
        assert_eq!(report.path, dest.path().join("icons.zip"));

        let mut archive = zip::ZipArchive::new(File::open(&report.path).unwrap()).unwrap();
        let mut content = String::new();
        archive
            .by_name("Navigation/mdi-arrow.svg")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "<svg>arrow</svg>");
        assert!(archive.by_name("mdi-home.svg").is_ok());
    }

    #[tokio::test]
    async fn test_archive_inside_source_is_not_included() {
        let src = TempDir::new().unwrap();
        fs::write(src.path().join("mdi-home.svg"), "<svg/>").unwrap();

        let report = run_archive(src.path(), &src.path().join("bundle.zip"))
            .await
            .unwrap();

        assert_eq!(report.files, 1);
        let archive = zip::ZipArchive::new(File::open(&report.path).unwrap()).unwrap();
        assert_eq!(archive.len(), 1);
    }
}
