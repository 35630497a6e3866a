use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from export collaborators.
#[derive(Debug, Error)]
pub enum ExportError {
    /// External tool ran and reported failure
    #[error("'{tool}' failed: {detail}")]
    ToolFailed { tool: String, detail: String },

    /// External tool could not be started
    #[error(
        "'{tool}' command not found: {detail}. \
         Please install it using your package manager."
    )]
    ToolMissing { tool: String, detail: String },

    /// Viewer template references a name with no value
    #[error("template placeholder '@{0}' has no value")]
    UnknownPlaceholder(String),

    /// An input the export needs is not on disk
    #[error("input {0} does not exist")]
    MissingInput(PathBuf),

    #[error("failed to write {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to serialize metadata: {0}")]
    Json(#[from] serde_json::Error),
}
