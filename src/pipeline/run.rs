// src/pipeline/run.rs

//! End-to-end download run: resolve → list → filter → fetch → post-process.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{CollectionKey, Config, RunSummary};
use crate::pipeline::archive::{ArchiveReport, archive_path, run_archive};
use crate::pipeline::fetch::{FetchPipeline, partition};
use crate::pipeline::postprocess::{PostProcessOptions, PostProcessReport, post_process};
use crate::services::{ItemFilter, fetch_listing, listing_source, resolve};
use crate::storage::OutputDir;
use crate::utils::progress::Progress;

/// Everything a single run needs besides configuration.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    /// Prefix or set URL
    pub target: String,
    pub out_dir: PathBuf,
    pub filter: ItemFilter,
    pub concurrency: usize,
    pub size: Option<u32>,
    pub overwrite: bool,
    /// Local icon-set JSON used instead of the network listing
    pub local_json: Option<PathBuf>,
    pub post_process: PostProcessOptions,
    pub zip: Option<PathBuf>,
    pub dry_run: bool,
}

impl DownloadRequest {
    /// A request for `target` using the configured download defaults.
    pub fn new(target: impl Into<String>, config: &Config) -> Self {
        Self {
            target: target.into(),
            out_dir: config.download.out_dir.clone(),
            filter: ItemFilter::default(),
            concurrency: config.download.concurrency,
            size: config.download.size,
            overwrite: config.download.overwrite,
            local_json: None,
            post_process: PostProcessOptions::default(),
            zip: None,
            dry_run: false,
        }
    }
}

/// What a dry run would have done.
#[derive(Debug, Clone)]
pub struct DryRunPlan {
    pub to_fetch: usize,
    pub out_dir: PathBuf,
    pub rename: bool,
    pub move_to_categories: bool,
    pub zip: Option<PathBuf>,
}

impl DryRunPlan {
    /// Human-readable description, one action per line.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "[dry-run] Would download {} icons into {}",
            self.to_fetch,
            self.out_dir.display()
        )];
        if self.rename {
            lines.push("[dry-run] Would rename files to 'name.svg'".to_string());
        }
        if self.move_to_categories {
            lines.push("[dry-run] Would move files into category subfolders".to_string());
        }
        if let Some(zip) = &self.zip {
            lines.push(format!("[dry-run] Would zip directory to {}", zip.display()));
        }
        lines
    }
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct Completed {
    pub summary: RunSummary,
    pub post_process: PostProcessReport,
    pub license_written: bool,
    pub archive: Option<ArchiveReport>,
}

/// How a run ended.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    DryRun(DryRunPlan),
    Completed(Completed),
}

/// Report of one run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub key: CollectionKey,
    pub outcome: RunOutcome,
}

/// Run one download end to end.
///
/// Fatal: unresolvable input, a listing that fails on every source, an
/// empty listing, and filters that remove every icon. Per-icon failures end
/// up in the summary; post-processing and archive failures are logged.
pub async fn run_download(
    config: &Config,
    client: &Client,
    request: &DownloadRequest,
    progress: &dyn Progress,
) -> Result<RunReport> {
    let key = resolve(&request.target)?;
    log::debug!("Resolved '{}' to prefix '{}'", request.target, key);

    let source = listing_source(config, client, request.local_json.as_deref());
    let listing = fetch_listing(source.as_ref(), &key).await?;
    log::info!("Found {} icons in '{}'", listing.names.len(), key);

    let names = request.filter.apply(&listing.names);
    if names.is_empty() {
        return Err(AppError::NoItemsRemain);
    }
    if request.filter.is_active() {
        log::info!("{} icons left after filtering", names.len());
    }

    let out = OutputDir::new(&request.out_dir);
    let plan = partition(&out, &key, &names, request.overwrite).await;
    log::debug!(
        "{} to download, {} already present",
        plan.to_fetch.len(),
        plan.already_present.len()
    );

    if request.dry_run {
        let plan = DryRunPlan {
            to_fetch: plan.to_fetch.len(),
            out_dir: request.out_dir.clone(),
            rename: request.post_process.flatten,
            move_to_categories: request.post_process.by_category
                && !listing.categories.is_empty(),
            zip: request.zip.as_deref().map(archive_path),
        };
        return Ok(RunReport {
            key,
            outcome: RunOutcome::DryRun(plan),
        });
    }

    out.ensure().await?;
    let license_written = out.write_license(&key, &listing.info).await?;
    if license_written {
        log::debug!("Wrote license summary to {}", out.root().display());
    }

    let fetcher = FetchPipeline::new(client.clone(), config.endpoints.clone(), key.clone())
        .with_size(request.size)
        .with_concurrency(request.concurrency)
        .with_timeout(Duration::from_secs(config.http.item_timeout_secs));
    let summary = fetcher.run(&plan, progress).await;

    if summary.failed() > 0 {
        for failure in summary.failures_preview() {
            log::debug!("{}: {}", failure.name, failure.cause);
        }
        if summary.hidden_failures() > 0 {
            log::debug!("...and {} more errors.", summary.hidden_failures());
        }
    }

    let post_report = post_process(&out, &key, &names, &listing, request.post_process).await;

    let archive = match &request.zip {
        Some(zip) => match run_archive(out.root(), zip).await {
            Ok(report) => Some(report),
            Err(e) => {
                log::warn!("Failed to zip {}: {}", out.root().display(), e);
                None
            }
        },
        None => None,
    };

    Ok(RunReport {
        key,
        outcome: RunOutcome::Completed(Completed {
            summary,
            post_process: post_report,
            license_written,
            archive,
        }),
    })
}
