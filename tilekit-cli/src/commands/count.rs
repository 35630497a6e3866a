//! Count command - report how much of a tile set is already on disk.

use super::common::{Context, GlobalArgs};
use crate::error::CliError;

/// Run the count command.
pub fn run(global: &GlobalArgs, tileset: &str) -> Result<(), CliError> {
    let ctx = Context::load(global)?;
    let job = ctx.fetch_job(tileset)?;
    let set = job.tileset();

    println!("Tile set '{}' ({})", set.name(), set.provider().name());
    for zoom in set.zooms() {
        println!(
            "  zoom {:>2}: {:>8} tiles ({} x {})",
            zoom,
            set.tiles(zoom).len(),
            set.cols(zoom),
            set.rows(zoom)
        );
    }
    println!();
    println!("Total:             {}", job.total());
    println!("Already downloaded: {}", job.already_present().len());
    println!("To download:       {}", job.to_download().len());
    Ok(())
}
