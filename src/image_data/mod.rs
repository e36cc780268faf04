//! Image data model
//!
//! An [`ImageData`] is either [`Gray`](ImageData::Gray) or
//! [`Color`](ImageData::Color), chosen once at construction. Both layouts keep
//! an authoritative *original* sample buffer, an editable *display* sample
//! buffer and a packed RGB buffer derived from the display samples:
//!
//! ```text
//! original ──copy──▶ display ──pack──▶ display_buffer (0x00RRGGBB)
//!     ▲                 │
//!     └─make_permanent──┘
//! ```
//!
//! Filters edit the display samples, call [`ImageData::repack`] to preview,
//! and [`ImageData::make_permanent`] to commit before the next filter runs.

pub mod color;
pub mod gray;
pub mod record;

pub use color::ColorImage;
pub use gray::GrayImage;
pub use record::{sample_bounds, ImageRecord};

use std::ops::{Deref, DerefMut};

use crate::error::Result;

/// Which pixel layout a record uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Gray,
    Color,
}

impl ImageKind {
    /// Unpacked samples per pixel
    pub fn channels(self) -> usize {
        match self {
            ImageKind::Gray => 1,
            ImageKind::Color => 3,
        }
    }
}

/// A gray or color image record.
///
/// To duplicate an image use [`ImageData::clone_original`], which rebuilds
/// the copy from the original samples. The derived `Clone` is a structural
/// copy that also carries uncommitted display edits and the packed buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageData {
    Gray(GrayImage),
    Color(ColorImage),
}

impl ImageData {
    /// Wrap an unpacked sample array in the layout selected by `kind`
    pub fn new(kind: ImageKind, samples: Vec<i32>, width: usize, height: usize) -> Result<Self> {
        Ok(match kind {
            ImageKind::Gray => ImageData::Gray(GrayImage::new(samples, width, height)?),
            ImageKind::Color => ImageData::Color(ColorImage::new(samples, width, height)?),
        })
    }

    pub fn kind(&self) -> ImageKind {
        match self {
            ImageData::Gray(_) => ImageKind::Gray,
            ImageData::Color(_) => ImageKind::Color,
        }
    }

    pub fn is_color(&self) -> bool {
        self.kind() == ImageKind::Color
    }

    /// Build a new record of the same layout from this record's original
    /// samples.
    ///
    /// The copy starts with fresh display samples and a fresh packed buffer;
    /// uncommitted display edits of `self` are not carried over. Audio fields
    /// are preserved, the source path and modified flag are not.
    pub fn clone_original(&self) -> Result<Self> {
        let samples = self.original_samples().to_vec();
        let mut copy = ImageData::new(self.kind(), samples, self.width(), self.height())?;
        copy.inherit_media(self);
        Ok(copy)
    }

    /// Re-derive the packed display buffer from the display samples
    pub fn repack(&mut self) {
        match self {
            ImageData::Gray(image) => image.repack(),
            ImageData::Color(image) => image.repack(),
        }
    }

    pub fn as_gray(&self) -> Option<&GrayImage> {
        match self {
            ImageData::Gray(image) => Some(image),
            ImageData::Color(_) => None,
        }
    }

    pub fn as_color(&self) -> Option<&ColorImage> {
        match self {
            ImageData::Color(image) => Some(image),
            ImageData::Gray(_) => None,
        }
    }

    /// Original sample value(s) of the pixel at `(row, col)`: one entry for
    /// gray, three for color
    pub fn pixel(&self, row: usize, col: usize) -> Result<Vec<i32>> {
        match self {
            ImageData::Gray(image) => Ok(vec![image.gray(row, col)?]),
            ImageData::Color(image) => Ok(image.rgb(row, col)?.to_vec()),
        }
    }
}

impl Deref for ImageData {
    type Target = ImageRecord;

    fn deref(&self) -> &ImageRecord {
        match self {
            ImageData::Gray(image) => &**image,
            ImageData::Color(image) => &**image,
        }
    }
}

impl DerefMut for ImageData {
    fn deref_mut(&mut self) -> &mut ImageRecord {
        match self {
            ImageData::Gray(image) => &mut **image,
            ImageData::Color(image) => &mut **image,
        }
    }
}

impl From<GrayImage> for ImageData {
    fn from(image: GrayImage) -> Self {
        ImageData::Gray(image)
    }
}

impl From<ColorImage> for ImageData {
    fn from(image: ColorImage) -> Self {
        ImageData::Color(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImageError;

    #[test]
    fn test_new_dispatches_on_kind() {
        let gray = ImageData::new(ImageKind::Gray, vec![0; 6], 3, 2).unwrap();
        assert!(!gray.is_color());
        assert!(gray.as_gray().is_some());

        let color = ImageData::new(ImageKind::Color, vec![0; 18], 3, 2).unwrap();
        assert!(color.is_color());
        assert!(color.as_color().is_some());
        assert_eq!(color.display_buffer().len(), 6);
        assert_eq!(color.original_samples().len(), color.display_samples().len());
    }

    #[test]
    fn test_clone_original_is_deep() {
        let source = ImageData::new(ImageKind::Gray, vec![1, 2, 3, 4], 2, 2).unwrap();
        let mut copy = source.clone_original().unwrap();

        assert_eq!(copy.original_samples(), source.original_samples());
        assert_ne!(
            copy.original_samples().as_ptr(),
            source.original_samples().as_ptr()
        );

        copy.display_samples_mut()[0] = 77;
        copy.make_permanent();
        assert_eq!(copy.original_samples()[0], 77);
        assert_eq!(source.original_samples()[0], 1);
    }

    #[test]
    fn test_clone_original_drops_display_edits() {
        let mut source = ImageData::new(ImageKind::Color, vec![9, 8, 7, 6, 5, 4], 2, 1).unwrap();
        source.display_samples_mut()[0] = 200;
        source.repack();

        let copy = source.clone_original().unwrap();
        assert!(copy.is_color());
        assert_eq!(copy.display_samples(), source.original_samples());
        assert_ne!(copy.display_buffer(), source.display_buffer());

        // Structural clone keeps the uncommitted edit
        let structural = source.clone();
        assert_eq!(structural.display_samples()[0], 200);
        assert_eq!(structural.display_buffer(), source.display_buffer());
    }

    #[test]
    fn test_clone_original_keeps_audio_fields() {
        let mut source = ImageData::new(ImageKind::Gray, vec![0, 1], 2, 1).unwrap();
        source.set_audio(true, 44_100);
        source.set_source_path("/tmp/a.pgm");
        source.set_modified(true);

        let copy = source.clone_original().unwrap();
        assert!(copy.is_audio());
        assert_eq!(copy.sample_rate(), 44_100);
        assert!(copy.source_path().is_none());
        assert!(!copy.is_modified());
    }

    #[test]
    fn test_make_permanent_through_enum() {
        let mut image = ImageData::new(ImageKind::Gray, vec![5, 6, 7, 8], 2, 2).unwrap();
        image.display_samples_mut()[1] = 1000;
        image.make_permanent();
        assert_eq!(image.original_samples()[1], 1000);
        assert_eq!(image.max(), 1000);
        assert_eq!(image.min(), 5);
    }

    #[test]
    fn test_pixel_accessor() {
        let gray = ImageData::new(ImageKind::Gray, vec![3, 4], 2, 1).unwrap();
        assert_eq!(gray.pixel(0, 1).unwrap(), vec![4]);

        let color = ImageData::new(ImageKind::Color, vec![1, 2, 3], 1, 1).unwrap();
        assert_eq!(color.pixel(0, 0).unwrap(), vec![1, 2, 3]);
        assert!(matches!(color.pixel(1, 0), Err(ImageError::OutOfBounds { .. })));
    }

    #[test]
    fn test_kind_channels() {
        assert_eq!(ImageKind::Gray.channels(), 1);
        assert_eq!(ImageKind::Color.channels(), 3);
    }
}
