//! Error type for editor operations.

use thiserror::Error;

/// Result type alias for editor operations.
pub type Result<T> = std::result::Result<T, EditorError>;

/// Errors raised while opening, rendering, or exporting a photo.
///
/// Operations that act on an absent hat (resizing, rotating, removing) are
/// silent no-ops and never produce an error.
#[derive(Error, Debug)]
pub enum EditorError {
    /// The uploaded file could not be decoded as an image.
    #[error("Failed to decode image '{name}': {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },

    /// The hat sprite SVG could not be parsed.
    #[error("Failed to parse hat SVG: {0}")]
    Svg(#[from] resvg::usvg::Error),

    /// An emoji hat was requested that has no bundled artwork.
    #[error("Unsupported emoji: {0}")]
    UnsupportedEmoji(String),

    /// The hat sprite has no drawable area.
    #[error("Hat sprite is empty ({width}x{height})")]
    EmptySprite { width: u32, height: u32 },

    /// A rasterization surface could not be allocated.
    #[error("Cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },

    /// PNG encoding of the final scene failed.
    #[error("Failed to encode PNG: {0}")]
    Encode(#[source] image::ImageError),

    /// A configured color is not a valid hex string.
    #[error("Invalid color '{0}': expected #rrggbb")]
    InvalidColor(String),

    /// Configuration values are out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration JSON could not be parsed.
    #[error("Malformed configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
