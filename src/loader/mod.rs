//! Image loading and layout dispatch
//!
//! [`load`] picks a decoder from the file name, normalizes the decoded samples
//! to gray or color and wraps them in an [`ImageData`]:
//! - `.pgm`, `.ppm`, `.pnm` (any case) go through the netpbm decoder
//! - everything else goes through the `image` crate, format sniffed from content
//!
//! The loader keeps no state between calls.

pub mod bitmap;
pub mod pnm;

pub use bitmap::{extract_samples, read_bitmap, BitmapRaster};
pub use pnm::{decode_pnm, is_pnm_path, read_pnm, PnmRaster, PNM_EXTENSIONS};

use std::fmt;
use std::path::Path;
use std::time::Instant;

use log::{info, warn};

use crate::error::{ImageError, Result};
use crate::image_data::{ImageData, ImageKind};

/// Non-fatal conditions found while loading.
///
/// The image is still constructed from the raw values; only the packed display
/// buffer is clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// Smallest sample is below 0
    MinBelowZero(i32),
    /// Largest sample exceeds 255
    MaxAboveLimit(i32),
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::MinBelowZero(min) => write!(f, "Min value of {} is less than 0.", min),
            Advisory::MaxAboveLimit(max) => {
                write!(f, "Max value of {} exceeds limit of 255.", max)
            }
        }
    }
}

/// A loaded image together with any advisories raised while loading it
#[derive(Debug, Clone)]
pub struct Loaded {
    pub image: ImageData,
    pub advisories: Vec<Advisory>,
}

impl Loaded {
    pub fn into_image(self) -> ImageData {
        self.image
    }
}

/// Advisories for decoder-reported sample bounds
pub fn range_advisories(min: i32, max: i32) -> Vec<Advisory> {
    let mut advisories = Vec::new();
    if min < 0 {
        advisories.push(Advisory::MinBelowZero(min));
    }
    if max > 255 {
        advisories.push(Advisory::MaxAboveLimit(max));
    }
    advisories
}

/// Load the image at `path`
///
/// # Errors
/// * `Io` if the file cannot be read
/// * `MalformedRaster` if a netpbm file cannot be parsed
/// * `UnsupportedSampleLayout` if a netpbm file has neither 1 nor 3 samples
///   per pixel
/// * `Decode` if any other file cannot be decoded
/// * `ShapeMismatch` / `EmptyImage` if the decoded samples do not form an image
pub fn load(path: impl AsRef<Path>) -> Result<Loaded> {
    let path = path.as_ref();
    let start = Instant::now();

    let mut loaded = if is_pnm_path(path) {
        load_pnm(path)?
    } else {
        load_bitmap(path)?
    };
    loaded.image.set_source_path(path);

    for advisory in &loaded.advisories {
        warn!("{}: {}", path.display(), advisory);
    }
    info!(
        "Loaded {} ({}x{} {:?}) in {:.3}s",
        path.display(),
        loaded.image.width(),
        loaded.image.height(),
        loaded.image.kind(),
        start.elapsed().as_secs_f64()
    );

    Ok(loaded)
}

fn load_pnm(path: &Path) -> Result<Loaded> {
    from_pnm(read_pnm(path)?)
}

/// Wrap a decoded netpbm raster, choosing the layout from its samples per pixel
pub fn from_pnm(raster: PnmRaster) -> Result<Loaded> {
    let advisories = range_advisories(raster.min, raster.max);
    let kind = match raster.samples_per_pixel {
        1 => ImageKind::Gray,
        3 => ImageKind::Color,
        n => return Err(ImageError::UnsupportedSampleLayout(n)),
    };
    let image = ImageData::new(kind, raster.samples, raster.width, raster.height)?;
    Ok(Loaded { image, advisories })
}

fn load_bitmap(path: &Path) -> Result<Loaded> {
    let raster = read_bitmap(path)?;
    log::debug!(
        "{}: layout {:?} read as {:?}",
        path.display(),
        raster.layout,
        raster.kind
    );
    let image = ImageData::new(raster.kind, raster.samples, raster.width, raster.height)?;
    let advisories = range_advisories(image.min(), image.max());
    Ok(Loaded { image, advisories })
}
