//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and a single exit code.

use std::fmt;
use std::process;

use tilekit::config::ConfigError;
use tilekit::export::ExportError;
use tilekit::provider::ProviderError;
use tilekit::stitch::StitchError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(std::io::Error),
    /// Configuration file or tileset definition is invalid
    Config(ConfigError),
    /// HTTP client could not be built
    Provider(ProviderError),
    /// Mosaic could not be stitched
    Stitch(StitchError),
    /// Metadata, viewer or external tool failed
    Export(ExportError),
    /// Async runtime or signal handler could not be set up
    Runtime(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Export(ExportError::ToolMissing { tool, .. }) => {
                eprintln!();
                eprintln!("'{}' was not found on PATH.", tool);
                eprintln!("  mbtiles needs mb-util:   pip install mbutil");
                eprintln!("  geotiff needs GDAL:      sudo apt install gdal-bin python3-gdal");
            }
            CliError::Stitch(StitchError::TileMissing { .. }) => {
                eprintln!();
                eprintln!("Run 'tilekit download <tileset>' until every tile is present.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Config(e) => write!(f, "{}", e),
            CliError::Provider(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::Stitch(e) => write!(f, "Stitch failed: {}", e),
            CliError::Export(e) => write!(f, "Export failed: {}", e),
            CliError::Runtime(msg) => write!(f, "Runtime error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::LoggingInit(e) => Some(e),
            CliError::Config(e) => Some(e),
            CliError::Provider(e) => Some(e),
            CliError::Stitch(e) => Some(e),
            CliError::Export(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<ProviderError> for CliError {
    fn from(e: ProviderError) -> Self {
        CliError::Provider(e)
    }
}

impl From<StitchError> for CliError {
    fn from(e: StitchError) -> Self {
        CliError::Stitch(e)
    }
}

impl From<ExportError> for CliError {
    fn from(e: ExportError) -> Self {
        CliError::Export(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_wraps_library_errors() {
        let err = CliError::from(ConfigError::UnknownTileSet("alps".to_string()));
        assert_eq!(err.to_string(), "Unknown tileset 'alps'");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_runtime_message() {
        let err = CliError::Runtime("no signal handler".to_string());
        assert_eq!(err.to_string(), "Runtime error: no signal handler");
        assert!(err.source().is_none());
    }
}
