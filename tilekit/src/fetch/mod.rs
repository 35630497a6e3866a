//! Tile fetching.
//!
//! A [`FetchJob`] splits a [`TileSet`] into tiles already on disk and tiles
//! to download, then fetches the latter with bounded concurrency. Each
//! request is classified ([`TileFetch`]) and counted; per-tile failures
//! never abort the run. The job is consumed by [`FetchJob::run`], which
//! yields a [`CompletedFetch`], the handle a [`StitchJob`] needs.
//!
//! Tiles are dispatched in enumeration order and complete in any order.
//! There are no retries: running the job again attempts only the tiles
//! that are still missing.
//!
//! [`StitchJob`]: crate::stitch::StitchJob

mod counters;
mod outcome;
mod paths;
mod persist;
mod placeholder;

pub use counters::{FetchProgress, TileOutcome};
pub use outcome::TileFetch;
pub use paths::JobPaths;
pub use persist::{ensure_dir, save_tile, PersistError};
pub use placeholder::{blank_tile, generate_blank_tile};

use std::path::PathBuf;
use std::time::{Duration, Instant};

use futures::future;
use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::DEFAULT_CONCURRENCY;
use crate::provider::AsyncHttpClient;
use crate::tile::Tile;
use crate::tileset::TileSet;
use counters::FetchCounters;

/// Options for [`FetchJob::run`].
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Maximum number of requests in flight.
    pub concurrency: usize,
    /// Image written for 404 tiles. Defaults to a transparent 256×256 PNG.
    pub placeholder: Option<Vec<u8>>,
    /// Stops dispatching new tiles once cancelled.
    pub cancel: Option<CancellationToken>,
    /// Seed for balancer host selection.
    pub seed: Option<u64>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            placeholder: None,
            cancel: None,
            seed: None,
        }
    }
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_placeholder(mut self, placeholder: Vec<u8>) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Counters and timing of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSummary {
    pub progress: FetchProgress,
    /// Tiles that were on disk before the run.
    pub previously_present: usize,
    /// The run stopped dispatching because it was cancelled.
    pub cancelled: bool,
    pub elapsed: Duration,
}

/// A tile set partitioned against the filesystem, ready to fetch.
#[derive(Debug)]
pub struct FetchJob {
    paths: JobPaths,
    tileset: TileSet,
    to_download: Vec<Tile>,
    already_present: Vec<Tile>,
}

impl FetchJob {
    /// Partition `tileset` by checking each tile's file under `out_root`.
    pub fn new(out_root: impl Into<PathBuf>, tileset: TileSet) -> Self {
        let paths = JobPaths::new(out_root, tileset.folder());

        let (already_present, to_download): (Vec<Tile>, Vec<Tile>) = tileset
            .iter()
            .partition(|tile| paths.tile_path(tile).is_file());

        debug!(
            job = paths.job(),
            present = already_present.len(),
            to_download = to_download.len(),
            "Partitioned tile set"
        );

        Self {
            paths,
            tileset,
            to_download,
            already_present,
        }
    }

    pub fn paths(&self) -> &JobPaths {
        &self.paths
    }

    pub fn tileset(&self) -> &TileSet {
        &self.tileset
    }

    pub fn to_download(&self) -> &[Tile] {
        &self.to_download
    }

    pub fn already_present(&self) -> &[Tile] {
        &self.already_present
    }

    pub fn total(&self) -> usize {
        self.to_download.len() + self.already_present.len()
    }

    /// Finish without fetching anything.
    pub fn into_completed(self) -> CompletedFetch {
        let summary = FetchSummary {
            progress: FetchProgress::new(0),
            previously_present: self.already_present.len(),
            cancelled: false,
            elapsed: Duration::ZERO,
        };
        CompletedFetch {
            paths: self.paths,
            tileset: self.tileset,
            already_present: self.already_present,
            missing: self.to_download,
            summary,
        }
    }

    /// Fetch every tile in `to_download`.
    ///
    /// `progress` is called with a consistent snapshot after each attempt.
    pub async fn run<C, P>(self, client: &C, options: FetchOptions, progress: P) -> CompletedFetch
    where
        C: AsyncHttpClient,
        P: Fn(&FetchProgress) + Send + Sync,
    {
        let start = Instant::now();
        let FetchJob {
            paths,
            tileset,
            to_download,
            already_present,
        } = self;
        let previously_present = already_present.len();

        info!(
            job = paths.job(),
            provider = tileset.provider().name(),
            to_download = to_download.len(),
            present = previously_present,
            concurrency = options.concurrency,
            "Starting fetch"
        );

        let counters = FetchCounters::new(to_download.len());
        let present = Mutex::new(already_present);

        let placeholder: Option<&[u8]> = match options.placeholder.as_deref() {
            Some(bytes) => Some(bytes),
            None => match blank_tile() {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    warn!(error = %e, "Could not build blank tile");
                    None
                }
            },
        };

        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let cancel = options.cancel.clone();
        let provider = tileset.provider();

        {
            let counters = &counters;
            let present = &present;
            let paths = &paths;
            let progress = &progress;

            stream::iter(to_download.iter().copied())
                .take_while(|_| {
                    future::ready(!cancel.as_ref().is_some_and(|c| c.is_cancelled()))
                })
                .map(|tile| {
                    let url = provider.gen_url(&tile, &mut rng);
                    let path = paths.tile_path(&tile);
                    async move {
                        let outcome = fetch_one(client, tile, &url, path, placeholder).await;
                        if matches!(outcome, TileOutcome::Found | TileOutcome::NotFound) {
                            present.lock().push(tile);
                        }
                        let snapshot = counters.record(outcome);
                        progress(&snapshot);
                    }
                })
                .buffer_unordered(options.concurrency.max(1))
                .for_each(|_| future::ready(()))
                .await;
        }

        let final_progress = counters.snapshot();
        let already_present = present.into_inner();
        let missing: Vec<Tile> = {
            let have: std::collections::HashSet<&Tile> = already_present.iter().collect();
            to_download
                .iter()
                .filter(|t| !have.contains(t))
                .copied()
                .collect()
        };
        let cancelled = cancel.is_some_and(|c| c.is_cancelled());

        let summary = FetchSummary {
            progress: final_progress,
            previously_present,
            cancelled,
            elapsed: start.elapsed(),
        };

        info!(
            job = paths.job(),
            attempted = final_progress.attempted,
            found = final_progress.found,
            not_found = final_progress.not_found,
            blocked = final_progress.blocked,
            failed = final_progress.failed,
            missing = missing.len(),
            cancelled,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "Fetch finished"
        );

        CompletedFetch {
            paths,
            tileset,
            already_present,
            missing,
            summary,
        }
    }
}

async fn fetch_one<C: AsyncHttpClient>(
    client: &C,
    tile: Tile,
    url: &str,
    path: PathBuf,
    placeholder: Option<&[u8]>,
) -> TileOutcome {
    match TileFetch::classify(client.get(url).await) {
        TileFetch::Success(body) => match save_tile(body, path).await {
            Ok(()) => {
                debug!(tile = %tile, "Tile saved");
                TileOutcome::Found
            }
            Err(e) => {
                warn!(tile = %tile, error = %e, "Failed to write tile");
                TileOutcome::Failed
            }
        },
        TileFetch::NotFound => {
            debug!(tile = %tile, url, "Tile not found, writing placeholder");
            let Some(bytes) = placeholder else {
                warn!(tile = %tile, "No placeholder available for missing tile");
                return TileOutcome::Failed;
            };
            match save_tile(bytes.to_vec(), path).await {
                Ok(()) => TileOutcome::NotFound,
                Err(e) => {
                    warn!(tile = %tile, error = %e, "Failed to write placeholder");
                    TileOutcome::Failed
                }
            }
        }
        TileFetch::Blocked => {
            debug!(tile = %tile, url, "Tile request blocked");
            TileOutcome::Blocked
        }
        TileFetch::TransportError(reason) => {
            warn!(tile = %tile, url, reason = %reason, "Tile request failed");
            TileOutcome::Failed
        }
    }
}

/// A fetch that has finished.
///
/// Holds the final state of the job: which tiles are on disk and which are
/// still missing. Only obtainable from [`FetchJob::run`] or
/// [`FetchJob::into_completed`].
#[derive(Debug)]
pub struct CompletedFetch {
    paths: JobPaths,
    tileset: TileSet,
    already_present: Vec<Tile>,
    missing: Vec<Tile>,
    summary: FetchSummary,
}

impl CompletedFetch {
    pub fn paths(&self) -> &JobPaths {
        &self.paths
    }

    pub fn tileset(&self) -> &TileSet {
        &self.tileset
    }

    /// Tiles on disk, in the order they were found or written.
    pub fn already_present(&self) -> &[Tile] {
        &self.already_present
    }

    /// Tiles with no file after the run (blocked, failed or never dispatched).
    pub fn missing(&self) -> &[Tile] {
        &self.missing
    }

    pub fn summary(&self) -> &FetchSummary {
        &self.summary
    }

    /// True if every tile of the set is on disk.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}
