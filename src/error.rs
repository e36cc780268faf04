//! Error types for image loading and pixel access
//!
//! Every fatal condition aborts the single load/construction call that hit it.
//! Non-fatal conditions (out-of-range sample bounds) are reported as
//! [`Advisory`](crate::loader::Advisory) values instead.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ImageError>;

#[derive(Debug, Error)]
pub enum ImageError {
    /// Sample array length does not match `width * height * channels`
    #[error("expected {expected} samples for a {width}x{height} image with {channels} channel(s), got {actual}")]
    ShapeMismatch {
        width: usize,
        height: usize,
        channels: usize,
        expected: usize,
        actual: usize,
    },

    /// The image has no pixels
    #[error("image has no pixels")]
    EmptyImage,

    /// Accessor called with a location outside the image
    #[error("pixel (row {row}, col {col}) is outside a {width}x{height} image")]
    OutOfBounds {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },

    /// Packed color conversion input is not made of whole (r, g, b) triples
    #[error("color sample count {0} is not a multiple of 3")]
    InvalidLength(usize),

    /// Legacy raster reported a channel count other than 1 or 3
    #[error("unsupported samples per pixel: {0}")]
    UnsupportedSampleLayout(usize),

    /// The general bitmap decoder could not produce an image
    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Legacy raster file could not be parsed
    #[error("malformed raster {}: {reason}", .path.display())]
    MalformedRaster { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
