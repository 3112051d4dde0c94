//! Error types for drawboard_view

use thiserror::Error;

/// Errors raised by the view layer
#[derive(Error, Debug)]
pub enum ViewError {
    /// A renderer method was called from inside its own draw pass
    #[error("Renderer is busy drawing")]
    Busy,

    /// Config file could not be read
    #[error("Failed to read config {path}: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the schema
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config parsed but holds an unusable value
    #[error("Invalid config value: {0}")]
    InvalidConfig(String),
}

/// Result type for drawboard_view operations
pub type Result<T> = std::result::Result<T, ViewError>;
