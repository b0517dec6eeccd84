use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while parsing or validating tiler configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Zoom range string is malformed or has min > max
    #[error("Invalid zoom range '{input}': {reason}")]
    InvalidZoomRange { input: String, reason: String },

    /// Zoom level exceeds the supported maximum
    #[error("Zoom level {zoom} exceeds the maximum of {max}")]
    ZoomTooLarge { zoom: u8, max: u8 },

    /// Background color is not four comma-separated 0-255 components
    #[error("Invalid background color '{input}': {reason}")]
    InvalidColor { input: String, reason: String },

    /// Output format is not one the codec can write
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// Filename prefix is empty or contains a path separator
    #[error("Invalid tile prefix '{0}': must be non-empty and contain no path separators")]
    InvalidPrefix(String),

    /// Output tile size must be at least one pixel
    #[error("Invalid tile size {0}: must be greater than 0")]
    InvalidTileSize(u32),

    /// JPEG quality outside 1-100
    #[error("Invalid JPEG quality {0}: must be between 1 and 100")]
    InvalidQuality(u8),
}

/// Errors that can occur while preparing, cutting or writing tiles
#[derive(Debug, Clone, Error)]
pub enum TileError {
    /// Source bytes could not be decoded into an image
    #[error("Failed to decode image: {message}")]
    Decode { message: String },

    /// A tile could not be encoded into the output format
    #[error("Failed to encode tile: {message}")]
    Encode { message: String },

    /// Source image has a zero dimension
    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// Padded canvas is too large to allocate
    #[error("Padded canvas for a {long_side}px image at zoom {max_zoom} is too large")]
    CanvasTooLarge { long_side: u32, max_zoom: u8 },

    /// Partitioner was handed a canvas that is not square
    #[error("Canvas must be square, got {width}x{height}")]
    NonSquareCanvas { width: u32, height: u32 },

    /// Canvas side does not split into 2^zoom equal tiles
    #[error("Canvas side {side} is not divisible by {factor} (zoom {zoom})")]
    IndivisibleCanvas { side: u32, zoom: u8, factor: u32 },

    /// Output directory is absent and auto-creation is disabled
    #[error("Output directory does not exist: {}", .0.display())]
    OutputDirMissing(PathBuf),

    /// Filesystem error while reading the source or writing tiles
    #[error("I/O error at {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl TileError {
    /// Build an [`TileError::Io`] from a path and the underlying error.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        TileError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
