//! List command - show configured tile sets and available providers.

use super::common::{Context, GlobalArgs};
use crate::error::CliError;

/// Run the list command.
pub fn run(global: &GlobalArgs) -> Result<(), CliError> {
    let ctx = Context::load(global)?;
    let config = &ctx.config;

    println!("Tile sets:");
    if config.tilesets.is_empty() {
        println!("  (none configured)");
    }
    for (name, entry) in &config.tilesets {
        let spec = &entry.spec;
        let bounds = &spec.bounds;
        println!(
            "  {:<20} {:<20} zoom {}-{}  N {:.4} S {:.4} E {:.4} W {:.4}",
            name,
            entry.provider,
            spec.zooms.min(),
            spec.zooms.max(),
            bounds.north(),
            bounds.south(),
            bounds.east(),
            bounds.west(),
        );
        if !spec.description.is_empty() {
            println!("  {:<20} {}", "", spec.description);
        }
    }

    println!();
    println!("Providers:");
    for provider in ctx.config.catalog().iter() {
        println!(
            "  {:<20} {:<4} {}",
            provider.name(),
            provider.scheme().as_str(),
            provider.url_template()
        );
    }

    println!();
    println!("Output directory: {}", ctx.output_dir().display());
    Ok(())
}
