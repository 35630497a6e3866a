//! TileKit CLI - download map tiles and stitch them into mosaics.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tilekit::logging::{default_log_dir, default_log_file, init_logging};
use tracing::info;

use commands::common::GlobalArgs;
use commands::download::DownloadArgs;
use error::CliError;

#[derive(Parser, Debug)]
#[command(name = "tilekit")]
#[command(version, about = "Download map tiles and stitch them into georeferenced mosaics", long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.tilekit/config.ini)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output root directory, overriding [output] directory
    #[arg(long, global = true, value_name = "DIR")]
    output: Option<String>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List configured tile sets and available providers
    List,

    /// Show total, downloaded and remaining tiles
    Count {
        /// Tile set name from the config file
        tileset: String,
    },

    /// Download every missing tile
    Download {
        /// Tile set name from the config file
        tileset: String,

        /// Maximum concurrent requests
        #[arg(long)]
        concurrency: Option<usize>,

        /// Per-request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Write an HTML viewer for the downloaded tiles
    Viewer {
        /// Tile set name from the config file
        tileset: String,

        /// Custom template with @name placeholders
        #[arg(long, value_name = "FILE")]
        template: Option<PathBuf>,
    },

    /// Package the tiles into an MBTiles archive with mb-util
    Mbtiles {
        /// Tile set name from the config file
        tileset: String,
    },

    /// Stitch one zoom level into a PNG with a world file
    Stitch {
        /// Tile set name from the config file
        tileset: String,

        /// Zoom level (default: the tile set's maximum)
        #[arg(long)]
        zoom: Option<u8>,
    },

    /// Stitch, then convert to GeoTIFF with GDAL
    Geotiff {
        /// Tile set name from the config file
        tileset: String,

        /// Zoom level (default: the tile set's maximum)
        #[arg(long)]
        zoom: Option<u8>,
    },
}

fn main() {
    let cli = Cli::parse();

    let _guard = match init_logging(&default_log_dir(), default_log_file(), cli.verbose) {
        Ok(guard) => guard,
        Err(e) => CliError::LoggingInit(e).exit(),
    };
    info!(version = env!("CARGO_PKG_VERSION"), command = ?cli.command, "tilekit starting");

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let global = GlobalArgs {
        config: cli.config,
        output: cli.output,
    };

    match cli.command {
        Command::List => commands::list::run(&global),
        Command::Count { tileset } => commands::count::run(&global, &tileset),
        Command::Download {
            tileset,
            concurrency,
            timeout,
        } => commands::download::run(
            &global,
            DownloadArgs {
                tileset,
                concurrency,
                timeout,
            },
        ),
        Command::Viewer { tileset, template } => {
            commands::export::viewer(&global, &tileset, template.as_deref())
        }
        Command::Mbtiles { tileset } => commands::export::mbtiles(&global, &tileset),
        Command::Stitch { tileset, zoom } => commands::stitch::run(&global, &tileset, zoom),
        Command::Geotiff { tileset, zoom } => commands::export::geotiff(&global, &tileset, zoom),
    }
}
