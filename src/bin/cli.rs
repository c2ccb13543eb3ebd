//! iconify-dl CLI
//!
//! Downloads every SVG of an Iconify icon set into a local directory.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use iconify_dl::{
    error::Result,
    models::Config,
    pipeline::{DownloadRequest, PostProcessOptions, RunOutcome, run_download},
    services::ItemFilter,
    utils::{http, progress::BarProgress},
};

const EXIT_CODES: &str = "Exit codes:
  0  success (individual icon failures are listed in the summary)
  1  filesystem or other failure
  2  bad prefix, URL, filter, listing or configuration
  3  network failure, including a set unknown to both the API and the mirror";

/// iconify-dl - Iconify SVG bulk downloader
#[derive(Parser, Debug)]
#[command(
    name = "iconify-dl",
    version,
    about = "Download all SVG icons of an Iconify icon set",
    after_help = EXIT_CODES
)]
struct Cli {
    /// Icon-set prefix (e.g. `fluent`) or an icon-set URL
    #[arg(value_name = "PREFIX_OR_URL")]
    target: String,

    /// Output directory
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Comma-separated icon names to keep
    #[arg(long, default_value = "")]
    include: String,

    /// Comma-separated icon names to drop
    #[arg(long, default_value = "")]
    exclude: String,

    /// Keep only names containing this substring (case-insensitive)
    #[arg(long, default_value = "")]
    contains: String,

    /// Number of concurrent downloads
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Requested icon height in pixels
    #[arg(long)]
    size: Option<u32>,

    /// Download again even if the file exists
    #[arg(long)]
    overwrite: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Read the icon list from a local icon-set JSON file
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Save files as `name.svg` instead of `prefix-name.svg`
    #[arg(long)]
    no_prefix: bool,

    /// Move icons into one folder per category
    #[arg(long)]
    by_category: bool,

    /// Zip the output directory to this file
    #[arg(long, value_name = "FILE")]
    zip: Option<PathBuf>,

    /// Show what would be done without downloading
    #[arg(long)]
    dry_run: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Initialize logging based on the debug flag.
fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Merge file configuration and command line flags into one request.
fn build_request(cli: &Cli, config: &Config) -> DownloadRequest {
    let mut request = DownloadRequest::new(cli.target.as_str(), config);
    if let Some(out) = &cli.out {
        request.out_dir = out.clone();
    }
    if let Some(jobs) = cli.jobs {
        request.concurrency = jobs;
    }
    if cli.size.is_some() {
        request.size = cli.size;
    }
    request.overwrite |= cli.overwrite;
    request.filter = ItemFilter::from_csv(&cli.include, &cli.exclude, &cli.contains);
    request.local_json = cli.json.clone();
    request.post_process = PostProcessOptions {
        flatten: cli.no_prefix,
        by_category: cli.by_category,
    };
    request.zip = cli.zip.clone();
    request.dry_run = cli.dry_run;
    request
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => {
            let config = Config::load_or_default(path);
            log::debug!("Loaded configuration from {}", path.display());
            config
        }
        None => Config::default(),
    };
    config.validate()?;

    let request = build_request(&cli, &config);
    let client = http::create_async_client(&config.http)?;
    let progress = BarProgress::new();

    let report = run_download(&config, &client, &request, &progress).await?;

    match report.outcome {
        RunOutcome::DryRun(plan) => {
            for line in plan.lines() {
                println!("{}", line);
            }
        }
        RunOutcome::Completed(done) => {
            println!("{}", done.summary.status_line());
            if let Some(archive) = done.archive {
                println!("Zipped to {}", archive.path.display());
            }
        }
    }

    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        config.download.concurrency = 4;
        config.download.size = Some(32);

        let cli = Cli::parse_from([
            "iconify-dl",
            "mdi",
            "-o",
            "icons",
            "-j",
            "20",
            "--include",
            "home,user",
            "--no-prefix",
            "--dry-run",
        ]);
        let request = build_request(&cli, &config);

        assert_eq!(request.target, "mdi");
        assert_eq!(request.out_dir, PathBuf::from("icons"));
        assert_eq!(request.concurrency, 20);
        assert_eq!(request.size, Some(32));
        assert!(request.filter.is_active());
        assert!(request.post_process.flatten);
        assert!(!request.post_process.by_category);
        assert!(request.dry_run);
    }

    #[test]
    fn test_help_lists_exit_codes() {
        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("Exit codes:"));
        assert!(help.contains("3  network failure"));
    }

    #[test]
    fn test_defaults_come_from_config() {
        let config = Config::default();
        let cli = Cli::parse_from(["iconify-dl", "fluent"]);
        let request = build_request(&cli, &config);

        assert_eq!(request.out_dir, PathBuf::from("./iconify_svgs"));
        assert_eq!(request.concurrency, 12);
        assert!(!request.filter.is_active());
        assert!(request.zip.is_none());
    }
}
