//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The operation is not available on the current target
    #[error("Platform not supported: {0}")]
    Unsupported(String),

    /// Native surface could not be allocated
    #[error("Failed to create surface: {0}")]
    SurfaceCreation(String),

    /// A native touch event carried an action we do not model
    #[error("Unknown touch action: {0}")]
    UnknownTouchAction(i32),

    /// Generic platform error
    #[error("Platform error: {0}")]
    Other(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
