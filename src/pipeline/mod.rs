//! Pipeline entry points for download operations.
//!
//! - `run_download`: One full run, from prefix to files on disk
//! - `FetchPipeline`: Bounded-concurrency SVG fetching
//! - `post_process`: Flattened names and category folders
//! - `run_archive`: Zip the output directory

pub mod archive;
pub mod fetch;
pub mod postprocess;
pub mod run;

pub use archive::{ArchiveReport, archive_path, create_archive, run_archive};
pub use fetch::{DEFAULT_CONCURRENCY, FetchPipeline, partition};
pub use postprocess::{PostProcessOptions, PostProcessReport, post_process};
pub use run::{Completed, DownloadRequest, DryRunPlan, RunOutcome, RunReport, run_download};
