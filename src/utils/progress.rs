// src/utils/progress.rs

//! Progress reporting for batch fetches.
//!
//! The library reports through [`Progress`]; the CLI plugs in a terminal
//! progress bar when the `cli` feature is enabled.

/// Receives one tick per completed fetch.
pub trait Progress: Send + Sync {
    /// A batch of `total` items is starting.
    fn start(&self, label: &str, total: u64);

    /// One item finished, successfully or not.
    fn advance(&self);

    /// The batch is done.
    fn finish(&self);
}

/// Progress sink that ignores every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn start(&self, _label: &str, _total: u64) {}
    fn advance(&self) {}
    fn finish(&self) {}
}

#[cfg(feature = "cli")]
pub use bar::BarProgress;

#[cfg(feature = "cli")]
mod bar {
    use std::sync::Mutex;

    use indicatif::{ProgressBar, ProgressStyle};

    use super::Progress;

    /// Terminal progress bar using indicatif.
    #[derive(Default)]
    pub struct BarProgress {
        bar: Mutex<Option<ProgressBar>>,
    }

    impl BarProgress {
        pub fn new() -> Self {
            Self::default()
        }

        fn create_bar(label: &str, total: u64) -> ProgressBar {
            let pb = ProgressBar::new(total);
            let style = ProgressStyle::default_bar()
                .template("{msg}: {percent:>3}%|{bar:40.cyan/blue}| {pos}/{len} [{elapsed_precise}<{eta_precise}]")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░");
            pb.set_style(style);
            pb.set_message(label.to_string());
            pb
        }
    }

    impl Progress for BarProgress {
        fn start(&self, label: &str, total: u64) {
            if let Ok(mut guard) = self.bar.lock() {
                *guard = Some(Self::create_bar(label, total));
            }
        }

        fn advance(&self) {
            if let Ok(guard) = self.bar.lock() {
                if let Some(pb) = guard.as_ref() {
                    pb.inc(1);
                }
            }
        }

        fn finish(&self) {
            if let Ok(mut guard) = self.bar.lock() {
                if let Some(pb) = guard.take() {
                    pb.finish();
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;

    /// Counts ticks, for asserting on progress in other tests.
    #[derive(Default)]
    pub struct CountingProgress {
        pub total: AtomicU64,
        pub ticks: AtomicU64,
    }

    impl Progress for CountingProgress {
        fn start(&self, _label: &str, total: u64) {
            self.total.store(total, Ordering::SeqCst);
        }
        fn advance(&self) {
            self.ticks.fetch_add(1, Ordering::SeqCst);
        }
        fn finish(&self) {}
    }

    #[test]
    fn test_counting_progress() {
        let progress = CountingProgress::default();
        progress.start("demo", 2);
        progress.advance();
        progress.advance();
        progress.finish();
        assert_eq!(progress.ticks.load(Ordering::SeqCst), 2);
        assert_eq!(progress.total.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_no_progress_is_silent() {
        let progress = NoProgress;
        progress.start("demo", 10);
        progress.advance();
        progress.finish();
    }
}
