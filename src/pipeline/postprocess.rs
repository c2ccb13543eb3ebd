// src/pipeline/postprocess.rs

//! Renaming and category folders for downloaded icons.

use std::collections::HashMap;
use std::path::Path;

use crate::models::{CollectionKey, Listing};
use crate::storage::OutputDir;

/// Which post-processing steps to run.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostProcessOptions {
    /// Rename `{key}-{name}.svg` to `{name}.svg`
    pub flatten: bool,
    /// Move icons into per-category folders
    pub by_category: bool,
}

impl PostProcessOptions {
    /// Whether any step applies to this listing.
    pub fn applies_to(&self, listing: &Listing) -> bool {
        self.flatten || (self.by_category && !listing.categories.is_empty())
    }
}

/// Counts of files touched by post-processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostProcessReport {
    pub moved: usize,
    pub skipped: usize,
}

/// Rename and/or relocate the downloaded icons among `names`.
///
/// Only files that exist are touched. A failed move is logged and
/// skipped. An icon listed in several categories goes to the first one
/// in document order.
pub async fn post_process(
    out: &OutputDir,
    key: &CollectionKey,
    names: &[String],
    listing: &Listing,
    options: PostProcessOptions,
) -> PostProcessReport {
    let mut report = PostProcessReport::default();
    if !options.applies_to(listing) {
        return report;
    }

    let folders = if options.by_category {
        category_folders(listing)
    } else {
        HashMap::new()
    };

    for name in names {
        let src = out.item_path(key, name);
        if !tokio::fs::try_exists(&src).await.unwrap_or(false) {
            continue;
        }

        let target_dir = match folders.get(name.as_str()) {
            Some(folder) => out.root().join(folder),
            None => out.root().to_path_buf(),
        };
        let file_name = if options.flatten {
            format!("{}.svg", name)
        } else {
            OutputDir::item_file_name(key, name)
        };
        let dst = target_dir.join(file_name);
        if dst == src {
            continue;
        }

        match move_file(&src, &target_dir, &dst).await {
            Ok(()) => report.moved += 1,
            Err(e) => {
                log::debug!(
                    "move failed for {} -> {}: {}",
                    src.display(),
                    dst.display(),
                    e
                );
                report.skipped += 1;
            }
        }
    }

    log::debug!("Post-process moved/renamed {} files", report.moved);
    report
}

async fn move_file(src: &Path, target_dir: &Path, dst: &Path) -> std::io::Result<()> {
    tokio::fs::create_dir_all(target_dir).await?;
    tokio::fs::rename(src, dst).await
}

/// Map each icon to the folder of its first category.
fn category_folders(listing: &Listing) -> HashMap<&str, String> {
    let mut folders = HashMap::new();
    for (category, members) in &listing.categories {
        let Some(folder) = folder_name(category) else {
            continue;
        };
        for member in members {
            folders
                .entry(member.as_str())
                .or_insert_with(|| folder.clone());
        }
    }
    folders
}

/// Turn a category name into a single, safe path component.
fn folder_name(category: &str) -> Option<String> {
    let folder = category.trim().replace(['/', '\\'], "-");
    match folder.as_str() {
        "" | "." | ".." => None,
        _ => Some(folder),
    }
}
