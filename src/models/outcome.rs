// src/models/outcome.rs

//! Work items and fetch results.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// Maximum number of failures shown in diagnostics.
pub const FAILURE_DISPLAY_CAP: usize = 10;

/// One pending SVG fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub name: String,
    pub target: PathBuf,
}

/// Filtered names split into new work and files already on disk.
#[derive(Debug, Clone, Default)]
pub struct WorkPlan {
    pub to_fetch: Vec<WorkItem>,
    pub already_present: Vec<String>,
}

/// Result of a single fetch task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub name: String,
    pub error: Option<String>,
}

impl FetchOutcome {
    pub fn success(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            error: None,
        }
    }

    pub fn failure(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            error: Some(error.into()),
        }
    }
}

/// A failed item and its cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub name: String,
    pub cause: String,
}

/// Aggregate result of one batch run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub downloaded: usize,
    pub already_present: usize,
    pub failures: Vec<Failure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    /// Start an empty summary for a batch with `already_present` skipped items.
    pub fn begin(already_present: usize) -> Self {
        let now = Utc::now();
        Self {
            downloaded: 0,
            already_present,
            failures: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }

    /// Fold one outcome into the counts.
    pub fn record(&mut self, outcome: FetchOutcome) {
        match outcome.error {
            None => self.downloaded += 1,
            Some(cause) => self.failures.push(Failure {
                name: outcome.name,
                cause,
            }),
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Utc::now();
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Number of names accounted for by this summary.
    pub fn total(&self) -> usize {
        self.downloaded + self.already_present + self.failed()
    }

    /// The first failures, capped for display.
    pub fn failures_preview(&self) -> &[Failure] {
        &self.failures[..self.failures.len().min(FAILURE_DISPLAY_CAP)]
    }

    /// Failures beyond the display cap.
    pub fn hidden_failures(&self) -> usize {
        self.failures.len().saturating_sub(FAILURE_DISPLAY_CAP)
    }

    /// The final status line, e.g. `Done. 3 downloaded, 2 already present`.
    pub fn status_line(&self) -> String {
        let mut msg = format!("Done. {} downloaded", self.downloaded);
        if self.already_present > 0 {
            msg.push_str(&format!(", {} already present", self.already_present));
        }
        if self.failed() > 0 {
            msg.push_str(&format!(", {} failed", self.failed()));
        }
        msg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_tallies_outcomes() {
        let mut summary = RunSummary::begin(2);
        summary.record(FetchOutcome::success("home"));
        summary.record(FetchOutcome::failure("user", "404 Not Found"));
        summary.record(FetchOutcome::success("star"));

        assert_eq!(summary.downloaded, 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.total(), 5);
        assert_eq!(summary.failures[0].name, "user");
    }

    #[test]
    fn status_line_omits_zero_counts() {
        let mut summary = RunSummary::begin(0);
        summary.record(FetchOutcome::success("home"));
        assert_eq!(summary.status_line(), "Done. 1 downloaded");

        let mut summary = RunSummary::begin(2);
        summary.record(FetchOutcome::failure("x", "boom"));
        assert_eq!(
            summary.status_line(),
            "Done. 0 downloaded, 2 already present, 1 failed"
        );
    }

    #[test]
    fn failures_preview_is_capped() {
        let mut summary = RunSummary::begin(0);
        for i in 0..13 {
            summary.record(FetchOutcome::failure(format!("icon-{i}"), "timeout"));
        }
        assert_eq!(summary.failures_preview().len(), FAILURE_DISPLAY_CAP);
        assert_eq!(summary.hidden_failures(), 3);
        assert_eq!(summary.failures.len(), 13);
    }
}
