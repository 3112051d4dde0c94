//! Drawing error types

use thiserror::Error;

/// Errors raised (or logged) by drawing surfaces
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrawError {
    /// The surface has no native equivalent for the requested primitive
    #[error("Unsupported drawing operation: {0}")]
    UnsupportedOperation(&'static str),

    /// Path geometry that cannot be drawn (empty, or not starting with MoveTo)
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A draw was requested while no native surface is attached
    #[error("Drawing surface is detached")]
    DetachedSurface,

    /// Image decoding/encoding failed
    #[error("Image error: {0}")]
    Image(String),
}

/// Result type for drawing operations
pub type DrawResult<T> = std::result::Result<T, DrawError>;
