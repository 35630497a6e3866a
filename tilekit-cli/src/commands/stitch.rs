//! Stitch command - compose one zoom level into a georeferenced PNG.

use indicatif::{ProgressBar, ProgressStyle};
use tilekit::fetch::CompletedFetch;
use tilekit::stitch::{StitchJob, StitchOutput};

use super::common::{Context, GlobalArgs};
use crate::error::CliError;

/// Run the stitch command.
pub fn run(global: &GlobalArgs, tileset: &str, zoom: Option<u8>) -> Result<(), CliError> {
    let ctx = Context::load(global)?;
    let completed = ctx.completed(tileset)?;
    let output = stitch(&completed, zoom)?;
    print_output(&output);
    Ok(())
}

/// Stitch `zoom` (default: the tile set's deepest level) with a progress bar.
pub fn stitch(completed: &CompletedFetch, zoom: Option<u8>) -> Result<StitchOutput, CliError> {
    let zoom = zoom.unwrap_or_else(|| completed.tileset().zoom_range().max());
    let job = StitchJob::new(completed, zoom)?;
    let (width, height) = job.dimensions();
    println!(
        "Stitching '{}' at zoom {} into {} x {} pixels",
        completed.tileset().name(),
        zoom,
        width,
        height
    );

    let bar = ProgressBar::new(completed.tileset().tiles(zoom).len() as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40.green/white} {pos}/{len} tiles") {
        bar.set_style(style);
    }
    let result = job.stitch_with_progress(|done, _| bar.set_position(done as u64));
    bar.finish_and_clear();
    Ok(result?)
}

pub fn print_output(output: &StitchOutput) {
    println!("Mosaic:     {}", output.mosaic.display());
    println!("World file: {}", output.world_file.display());
}
