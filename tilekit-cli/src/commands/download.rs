//! Download command - fetch every missing tile of a tile set.

use indicatif::{ProgressBar, ProgressStyle};
use tilekit::fetch::{CompletedFetch, FetchOptions, FetchProgress};
use tilekit::provider::ReqwestClient;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::common::{Context, GlobalArgs};
use crate::error::CliError;

/// Arguments for the download command.
pub struct DownloadArgs {
    pub tileset: String,
    pub concurrency: Option<usize>,
    pub timeout: Option<u64>,
}

/// Run the download command.
pub fn run(global: &GlobalArgs, args: DownloadArgs) -> Result<(), CliError> {
    let ctx = Context::load(global)?;

    let mut download = ctx.config.download.clone();
    if let Some(n) = args.concurrency {
        download = download.with_concurrency(n);
    }
    if let Some(secs) = args.timeout {
        download = download.with_timeout_secs(secs);
    }

    let job = ctx.fetch_job(&args.tileset)?;
    println!(
        "Tile set '{}': {} tiles, {} already downloaded",
        job.tileset().name(),
        job.total(),
        job.already_present().len()
    );
    if job.to_download().is_empty() {
        println!("Nothing to download.");
        return Ok(());
    }

    let client = ReqwestClient::with_settings(download.timeout_secs(), download.user_agent())?;

    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        eprintln!("\nCancelling: waiting for requests in flight...");
        handler_token.cancel();
    })
    .map_err(|e| CliError::Runtime(format!("Failed to install Ctrl-C handler: {}", e)))?;

    let bar = progress_bar(job.to_download().len() as u64);
    let options = FetchOptions::new()
        .with_concurrency(download.concurrency())
        .with_cancellation(cancel);

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::Runtime(format!("Failed to start async runtime: {}", e)))?;
    let done = runtime.block_on(job.run(&client, options, |p| update_bar(&bar, p)));
    bar.finish_and_clear();

    report(&done);
    Ok(())
}

/// Print the run summary. Tiles left missing are a notice, not an error.
fn report(done: &CompletedFetch) {
    let summary = done.summary();
    println!("{}", summary.progress);
    println!("Elapsed: {:.1}s", summary.elapsed.as_secs_f64());
    info!(
        job = done.paths().job(),
        attempted = summary.progress.attempted,
        cancelled = summary.cancelled,
        "Download finished"
    );

    if done.is_complete() {
        println!("All tiles present in {}", done.paths().tiles_dir().display());
    } else {
        warn!(missing = done.missing().len(), "Tiles still missing");
        println!(
            "{} tiles still missing; run download again to retry them.",
            done.missing().len()
        );
    }
}

fn progress_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    if let Ok(style) =
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}] {msg}")
    {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

fn update_bar(bar: &ProgressBar, progress: &FetchProgress) {
    bar.set_position(progress.attempted as u64);
    bar.set_message(format!(
        "found {} / 404 {} / 403 {} / failed {}",
        progress.found, progress.not_found, progress.blocked, progress.failed
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilekit::config::ConfigFile;
    use tilekit::fetch::FetchJob;
    use tempfile::TempDir;

    #[test]
    fn test_report_accepts_missing_tiles() {
        let temp = TempDir::new().unwrap();
        let config = ConfigFile::from_ini_str(
            "[tileset.w]\nprovider = osm\nnorth = 1\nsouth = 0\neast = 1\nwest = 0\nzoom_max = 1\n",
        )
        .unwrap();
        let done = FetchJob::new(temp.path(), config.tileset("w").unwrap()).into_completed();

        assert!(!done.is_complete());
        report(&done);
    }

    #[test]
    fn test_update_bar_tracks_attempted() {
        let bar = ProgressBar::hidden();
        let progress = FetchProgress {
            attempted: 3,
            found: 1,
            not_found: 1,
            blocked: 1,
            failed: 0,
            total: 5,
        };
        update_bar(&bar, &progress);
        assert_eq!(bar.position(), 3);
        assert_eq!(bar.message(), "found 1 / 404 1 / 403 1 / failed 0");
    }
}
