// src/pipeline/fetch.rs

//! Bounded-concurrency SVG fetching.
//!
//! Names are first partitioned against the output directory, so files that
//! already exist are not requested again unless overwriting. The remaining
//! work is fanned out with at most `concurrency` requests in flight. A
//! failed item never aborts its siblings; every item yields exactly one
//! [`FetchOutcome`].

use std::time::Duration;

use futures::stream::{self, StreamExt};
use reqwest::Client;

use crate::error::Result;
use crate::models::{CollectionKey, Endpoints, FetchOutcome, RunSummary, WorkItem, WorkPlan};
use crate::storage::OutputDir;
use crate::utils::http::fetch_bytes;
use crate::utils::progress::Progress;

/// Default number of concurrent requests.
pub const DEFAULT_CONCURRENCY: usize = 12;

/// Default per-request timeout.
const DEFAULT_ITEM_TIMEOUT: Duration = Duration::from_secs(40);

/// Split names into work and already-present files.
pub async fn partition(
    out: &OutputDir,
    key: &CollectionKey,
    names: &[String],
    overwrite: bool,
) -> WorkPlan {
    let mut plan = WorkPlan::default();
    for name in names {
        let target = out.item_path(key, name);
        if !overwrite && tokio::fs::try_exists(&target).await.unwrap_or(false) {
            plan.already_present.push(name.clone());
        } else {
            plan.to_fetch.push(WorkItem {
                name: name.clone(),
                target,
            });
        }
    }
    plan
}

/// Fetches the SVGs of one collection.
#[derive(Debug, Clone)]
pub struct FetchPipeline {
    client: Client,
    endpoints: Endpoints,
    key: CollectionKey,
    size: Option<u32>,
    concurrency: usize,
    timeout: Duration,
}

impl FetchPipeline {
    pub fn new(client: Client, endpoints: Endpoints, key: CollectionKey) -> Self {
        Self {
            client,
            endpoints,
            key,
            size: None,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_ITEM_TIMEOUT,
        }
    }

    /// Request icons rendered at this height. Zero means the default.
    pub fn with_size(mut self, size: Option<u32>) -> Self {
        self.size = size.filter(|s| *s > 0);
        self
    }

    /// Maximum requests in flight, clamped to at least one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// URL of a single icon.
    pub fn item_url(&self, name: &str) -> String {
        self.endpoints.api(&format!("{}:{}.svg", self.key, name))
    }

    /// Partition `names` against `out`, then fetch the new work.
    pub async fn execute(
        &self,
        out: &OutputDir,
        names: &[String],
        overwrite: bool,
        progress: &dyn Progress,
    ) -> RunSummary {
        let plan = partition(out, &self.key, names, overwrite).await;
        self.run(&plan, progress).await
    }

    /// Fetch every item in the plan and aggregate the outcomes.
    ///
    /// Outcomes arrive in completion order.
    pub async fn run(&self, plan: &WorkPlan, progress: &dyn Progress) -> RunSummary {
        let mut summary = RunSummary::begin(plan.already_present.len());

        log::debug!(
            "{} to download, {} already present ({} concurrent)",
            plan.to_fetch.len(),
            plan.already_present.len(),
            self.concurrency
        );

        progress.start(
            &format!("Downloading {}", self.key),
            plan.to_fetch.len() as u64,
        );

        let mut outcomes = stream::iter(&plan.to_fetch)
            .map(|item| self.fetch_one(item))
            .buffer_unordered(self.concurrency);

        while let Some(outcome) = outcomes.next().await {
            summary.record(outcome);
            progress.advance();
        }

        progress.finish();
        summary.finish();
        summary
    }

    /// Fetch one icon and write it in place. Never fails past this point.
    async fn fetch_one(&self, item: &WorkItem) -> FetchOutcome {
        if !OutputDir::is_safe_name(&item.name) {
            return FetchOutcome::failure(&item.name, "icon name is not a valid file name");
        }

        match self.download(item).await {
            Ok(()) => FetchOutcome::success(&item.name),
            Err(e) => FetchOutcome::failure(&item.name, e.to_string()),
        }
    }

    async fn download(&self, item: &WorkItem) -> Result<()> {
        let query: Vec<(&str, String)> = self
            .size
            .map(|size| vec![("height", size.to_string())])
            .unwrap_or_default();

        let body = fetch_bytes(&self.client, &self.item_url(&item.name), &query, self.timeout).await?;
        OutputDir::write_atomic(&item.target, &body).await
    }
}
