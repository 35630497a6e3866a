use thiserror::Error;

/// Configuration errors.
///
/// Covers both the config file itself and the validation of the values it
/// describes (bounds, zoom ranges, names).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or parse the config file
    #[error("Failed to read config file: {0}")]
    Read(#[from] ini::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// A required key is absent
    #[error("Missing configuration: {section}.{key}")]
    MissingKey { section: String, key: String },

    /// Bounding box failed validation
    #[error("Invalid bounding box: {0}")]
    InvalidBounds(String),

    /// Zoom range failed validation
    #[error("Invalid zoom range {min}..={max}: {reason}")]
    InvalidZoomRange { min: u8, max: u8, reason: String },

    /// No provider with this name is built in or configured
    #[error("Unknown provider '{0}'")]
    UnknownProvider(String),

    /// No tileset section with this name
    #[error("Unknown tileset '{0}'")]
    UnknownTileSet(String),
}

impl ConfigError {
    pub(crate) fn invalid(
        section: &str,
        key: &str,
        value: &str,
        reason: impl Into<String>,
    ) -> Self {
        ConfigError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
