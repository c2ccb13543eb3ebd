//! Local output directory.
//!
//! Owns file naming (`{key}-{name}.svg`), atomic writes and the
//! `LICENSE.txt` summary.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::{CollectionInfo, CollectionKey};

/// File name of the license summary.
pub const LICENSE_FILE: &str = "LICENSE.txt";

/// Suffix of in-flight downloads.
const PARTIAL_SUFFIX: &str = ".part";

/// Output directory for one collection.
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    /// Create an OutputDir rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory if absent.
    pub async fn ensure(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// File name for an icon before any post-processing.
    pub fn item_file_name(key: &CollectionKey, name: &str) -> String {
        format!("{}-{}.svg", key, name)
    }

    /// Full path for an icon before any post-processing.
    pub fn item_path(&self, key: &CollectionKey, name: &str) -> PathBuf {
        self.root.join(Self::item_file_name(key, name))
    }

    /// Whether an icon name can be used as part of a single file name.
    pub fn is_safe_name(name: &str) -> bool {
        !name.is_empty() && !name.contains(['/', '\\']) && !name.contains("..")
    }

    /// Write bytes atomically (write to temp, then rename).
    ///
    /// A failed write removes the temporary file and leaves `path` as it was.
    pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
        let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(PARTIAL_SUFFIX);
        let tmp = path.with_file_name(tmp_name);

        let result: std::io::Result<()> = async {
            let mut file = tokio::fs::File::create(&tmp).await?;
            file.write_all(bytes).await?;
            file.flush().await?;
            drop(file);
            tokio::fs::rename(&tmp, path).await
        }
        .await;

        if let Err(e) = result {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    /// Write `LICENSE.txt` when the metadata names a license.
    ///
    /// Returns whether the file was written.
    pub async fn write_license(&self, key: &CollectionKey, info: &CollectionInfo) -> Result<bool> {
        let Some(license) = &info.license else {
            return Ok(false);
        };
        let (name, reference) = (license.display_name(), license.reference());
        if name.is_none() && reference.is_none() {
            return Ok(false);
        }

        let text = format!(
            "Iconify set: {}\nLicense: {}\nReference: {}\nNote: Some sets need attribution. Check upstream license before redistribution.\n",
            key,
            name.unwrap_or("N/A"),
            reference.unwrap_or("N/A"),
        );
        Self::write_atomic(&self.root.join(LICENSE_FILE), text.as_bytes()).await?;
        Ok(true)
    }
}
